//! Strongly-typed ID wrappers
//!
//! Newtypes over UUIDs so record and account identifiers cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Whether `query` names this ID, either as the full UUID, the
            /// short display form, or a prefix of the UUID
            pub fn matches(&self, query: &str) -> bool {
                let query = query.strip_prefix($display_prefix).unwrap_or(query);
                !query.is_empty() && self.0.to_string().starts_with(&query.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(RecordId, "rec-");
define_id!(AccountId, "acct-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = RecordId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("rec-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_id_matches() {
        let id = RecordId::new();
        let full = id.as_uuid().to_string();

        assert!(id.matches(&full));
        assert!(id.matches(&id.to_string()));
        assert!(id.matches(&full[..4]));
        assert!(!id.matches(""));
        assert!(!id.matches("rec-"));
    }

    #[test]
    fn test_id_serialization() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: AccountId = uuid_str.parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);

        let prefixed: AccountId = format!("acct-{}", uuid_str).parse().unwrap();
        assert_eq!(id, prefixed);
    }
}
