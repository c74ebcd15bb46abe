//! Opaque string identifiers for users, proposals, and comments.
//!
//! Clients choose user ids; proposal and comment ids are generated by the
//! server. Both arrive as arbitrary strings, so the only structural rules are
//! that an id is non-empty, carries no surrounding whitespace, and fits in
//! [`MAX_ID_LENGTH`] characters.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest identifier accepted from clients.
pub const MAX_ID_LENGTH: usize = 128;

/// Validation errors shared by every identifier type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier had leading or trailing whitespace.
    #[error("identifier must not contain surrounding whitespace")]
    SurroundingWhitespace,
    /// The identifier exceeded [`MAX_ID_LENGTH`] characters.
    #[error("identifier must be at most {max} characters")]
    TooLong { max: usize },
}

fn validate(raw: &str) -> Result<(), IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdValidationError::SurroundingWhitespace);
    }
    if raw.chars().count() > MAX_ID_LENGTH {
        return Err(IdValidationError::TooLong { max: MAX_ID_LENGTH });
    }
    Ok(())
}

macro_rules! define_opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(raw: impl Into<String>) -> Result<Self, IdValidationError> {
                let raw = raw.into();
                validate(&raw)?;
                Ok(Self(raw))
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_opaque_id! {
    /// Client-chosen user identifier.
    UserId
}

define_opaque_id! {
    /// Proposal identifier.
    ProposalId
}

define_opaque_id! {
    /// Comment identifier.
    CommentId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("u1")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case("user with inner spaces")]
    fn accepts_opaque_strings(#[case] raw: &str) {
        let id = UserId::new(raw).expect("valid id");
        assert_eq!(id.as_str(), raw);
    }

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case(" p1", IdValidationError::SurroundingWhitespace)]
    #[case("p1\n", IdValidationError::SurroundingWhitespace)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(ProposalId::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_ids() {
        let raw = "x".repeat(MAX_ID_LENGTH + 1);
        assert_eq!(
            CommentId::new(raw),
            Err(IdValidationError::TooLong { max: MAX_ID_LENGTH })
        );
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(ProposalId::random(), ProposalId::random());
    }

    #[rstest]
    fn deserialises_through_validation() {
        let parsed: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: UserId = serde_json::from_str("\"u1\"").expect("valid id");
        assert_eq!(parsed.as_str(), "u1");
    }
}
