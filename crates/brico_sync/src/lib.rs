pub mod engine;
pub mod error;
pub mod progress;

pub use engine::{SyncOutcome, Synchronizer};
pub use error::SyncError;
pub use progress::{LogProgress, NoProgress, Progress};

pub mod prelude {
    pub use super::{Progress, SyncError, SyncOutcome, Synchronizer};
    pub use brico_core::{ArticleDraft, Error, Result};
}
