use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Id prefixes the dashboard uses for entities that only exist locally.
/// Anything else is an opaque id minted by the backend.
const RESERVED_PREFIXES: [&str; 4] = ["temp-", "section-", "para-", "img-"];

/// Whether an entity already lives on the backend.
///
/// Drafts assembled in the editor carry placeholder ids until the first
/// save; the synchronizer branches on this instead of matching prefixes
/// all over the place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Not yet persisted; must be created before children can reference it.
    New,
    /// Persisted under this backend-assigned id.
    Persisted(String),
}

impl Identity {
    /// Classify a raw id string coming in from a serialized draft.
    pub fn classify(id: impl Into<String>) -> Self {
        let id = id.into();
        if RESERVED_PREFIXES.iter().any(|p| id.starts_with(p)) {
            Identity::New
        } else {
            Identity::Persisted(id)
        }
    }

    /// Mint a fresh placeholder id for drafts that round-trip through JSON.
    pub fn placeholder() -> String {
        format!("temp-{}", uuid::Uuid::new_v4())
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Identity::New)
    }

    pub fn persisted(&self) -> Option<&str> {
        match self {
            Identity::Persisted(id) => Some(id.as_str()),
            Identity::New => None,
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::New
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Identity::Persisted(id) => serializer.serialize_str(id),
            Identity::New => serializer.serialize_str("temp-new"),
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Identity::classify(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_prefixes_classify_as_new() {
        for id in ["temp-1", "section-temp-1", "para-temp-2", "img-temp-1"] {
            assert!(Identity::classify(id).is_new(), "{} should be new", id);
        }
    }

    #[test]
    fn test_other_ids_classify_as_persisted() {
        for id in ["art-1", "sec-1", "p-2", "550e8400-e29b-41d4-a716-446655440000", ""] {
            let identity = Identity::classify(id);
            assert_eq!(identity.persisted(), Some(id), "{} should be persisted", id);
        }
    }

    #[test]
    fn test_placeholder_classifies_as_new() {
        assert!(Identity::classify(Identity::placeholder()).is_new());
    }

    #[test]
    fn test_serde_boundary() {
        let identity: Identity = serde_json::from_str("\"section-temp-1\"").unwrap();
        assert!(identity.is_new());

        let identity: Identity = serde_json::from_str("\"sec-42\"").unwrap();
        assert_eq!(identity.persisted(), Some("sec-42"));

        let json = serde_json::to_string(&Identity::Persisted("sec-42".into())).unwrap();
        assert_eq!(json, "\"sec-42\"");
    }
}
