//! Driving port for user creation and emoji-combination login.

use async_trait::async_trait;

use crate::domain::{DisplayName, Error, LoginCredentials, User, UserId};

/// Create-or-fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureUserRequest {
    pub user_id: UserId,
    pub display_name: DisplayName,
}

/// Create-or-fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureUserResponse {
    pub user: User,
    pub created: bool,
}

/// Login attempt for a client-held user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub user_id: UserId,
    pub display_name: DisplayName,
    pub credentials: LoginCredentials,
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub user: User,
    /// `true` when this attempt registered the credentials.
    pub first_login: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Return the user, creating it with the given name when unseen.
    async fn ensure_user(&self, request: EnsureUserRequest) -> Result<EnsureUserResponse, Error>;

    /// Register credentials on first login, or verify them afterwards.
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, Error>;
}
