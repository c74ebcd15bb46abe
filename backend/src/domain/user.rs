//! User identity, display names, and emoji login credentials.

use std::fmt;

use chrono::{DateTime, Utc};

use super::UserId;

/// Display name assigned when a client does not supply one.
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 50;

/// Maximum length of each login credential part.
pub const CREDENTIAL_PART_MAX: usize = 64;

/// Validation errors for user-facing fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Display name was longer than [`DISPLAY_NAME_MAX`].
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    /// A credential part was blank.
    #[error("{field} must not be empty")]
    EmptyCredential { field: &'static str },
    /// A credential part was longer than [`CREDENTIAL_PART_MAX`].
    #[error("{field} must be at most {max} characters")]
    CredentialTooLong { field: &'static str, max: usize },
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate a display name, trimming surrounding whitespace.
    ///
    /// Blank input falls back to [`DEFAULT_DISPLAY_NAME`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Ok(Self::anonymous());
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Parse an optional display name, defaulting when absent.
    pub fn from_optional(raw: Option<&str>) -> Result<Self, UserValidationError> {
        raw.map_or_else(|| Ok(Self::anonymous()), Self::new)
    }

    /// The placeholder name for users who never chose one.
    pub fn anonymous() -> Self {
        Self(DEFAULT_DISPLAY_NAME.to_owned())
    }

    /// Borrow the display name text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Rehydrate a stored display name without re-validating it.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub display_name: DisplayName,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Emoji-combination login: an emoji sequence plus two picked selection ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    emoji_combination: String,
    first_selection_id: String,
    second_selection_id: String,
}

impl LoginCredentials {
    /// Validate the three credential parts.
    pub fn try_from_parts(
        emoji_combination: &str,
        first_selection_id: &str,
        second_selection_id: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            emoji_combination: credential_part("emojiCombination", emoji_combination)?,
            first_selection_id: credential_part("firstSelectionId", first_selection_id)?,
            second_selection_id: credential_part("secondSelectionId", second_selection_id)?,
        })
    }

    /// Emoji sequence chosen by the user.
    pub fn emoji_combination(&self) -> &str {
        &self.emoji_combination
    }

    /// First selection identifier.
    pub fn first_selection_id(&self) -> &str {
        &self.first_selection_id
    }

    /// Second selection identifier.
    pub fn second_selection_id(&self) -> &str {
        &self.second_selection_id
    }
}

fn credential_part(field: &'static str, raw: &str) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyCredential { field });
    }
    if trimmed.chars().count() > CREDENTIAL_PART_MAX {
        return Err(UserValidationError::CredentialTooLong {
            field,
            max: CREDENTIAL_PART_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Stored user row together with any credentials set at first login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub credentials: Option<LoginCredentials>,
}
