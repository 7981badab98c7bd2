use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a library book.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(u64);

/// Unique identifier for a watchlist content item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(u64);

/// Unique identifier for a goal (reading or productivity).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalId(u64);

/// Unique identifier for a scheduled time block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeBlockId(u64);

macro_rules! numeric_id {
    ($name:ident) => {
        impl $name {
            /// Creates a new id from its raw value.
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value.
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map($name::new).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })
            }
        }
    };
}

numeric_id!(BookId);
numeric_id!(ContentId);
numeric_id!(GoalId);
numeric_id!(TimeBlockId);

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

/// Unique identifier for a timed session, assigned at creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Uuid);

/// Unique identifier for a book note, assigned at creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(Uuid);

macro_rules! uuid_id {
    ($name:ident) => {
        impl $name {
            /// Creates a fresh random id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(SessionId);
uuid_id!(NoteId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_display_roundtrip() {
        let id = BookId::new(42);
        assert_eq!(id.to_string(), "42");
        let parsed: BookId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn numeric_id_rejects_garbage() {
        let err = "not-a-number".parse::<GoalId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse GoalId from string");
    }

    #[test]
    fn numeric_id_debug_names_the_type() {
        assert_eq!(format!("{:?}", ContentId::new(7)), "ContentId(7)");
        assert_eq!(format!("{:?}", TimeBlockId::new(9)), "TimeBlockId(9)");
    }

    #[test]
    fn uuid_ids_are_unique_per_creation() {
        assert_ne!(SessionId::new(), SessionId::new());
        assert_ne!(NoteId::new(), NoteId::new());
    }
}
