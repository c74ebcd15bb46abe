//! Port abstraction for user persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{LoginCredentials, User, UserAccount, UserId};

use super::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user unless one with the same id exists.
    ///
    /// Returns `true` when a row was created.
    async fn insert_if_absent(&self, user: &User) -> Result<bool, StoreError>;

    /// Fetch a user and any stored credentials.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError>;

    /// Store login credentials for a user who has none yet.
    async fn set_credentials(
        &self,
        id: &UserId,
        credentials: &LoginCredentials,
    ) -> Result<(), StoreError>;

    /// Stamp the last successful login.
    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), StoreError>;
}
