/// Observer for the step currently in flight. Side-effect only: the
/// synchronizer never waits on it and ignores whatever it does.
pub trait Progress: Send + Sync {
    fn step(&self, label: &str);
}

impl<F> Progress for F
where
    F: Fn(&str) + Send + Sync,
{
    fn step(&self, label: &str) {
        self(label)
    }
}

/// Discards every step.
pub struct NoProgress;

impl Progress for NoProgress {
    fn step(&self, _label: &str) {}
}

/// Forwards steps to tracing at info level.
pub struct LogProgress;

impl Progress for LogProgress {
    fn step(&self, label: &str) {
        tracing::info!("{}", label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_observer() {
        let seen = Mutex::new(Vec::new());
        let observer = |label: &str| seen.lock().unwrap().push(label.to_string());
        observer.step("creating article");
        assert_eq!(seen.lock().unwrap().as_slice(), ["creating article"]);
    }
}
