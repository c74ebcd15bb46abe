//! User creation and emoji-combination login.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    EnsureUserRequest, EnsureUserResponse, LoginRequest, LoginResponse, UserAccounts,
    UserRepository,
};
use crate::domain::{DisplayName, Error, User, UserAccount, UserId};

/// Insert the user when unseen and return the stored account.
///
/// Shared by every use-case that accepts a client-chosen user id.
pub(crate) async fn ensure_account<U>(
    users: &U,
    id: &UserId,
    display_name: &DisplayName,
    at: DateTime<Utc>,
) -> Result<(UserAccount, bool), Error>
where
    U: UserRepository + ?Sized,
{
    let candidate = User {
        id: id.clone(),
        display_name: display_name.clone(),
        created_at: at,
        last_login_at: None,
    };
    if users.insert_if_absent(&candidate).await? {
        info!(user_id = %id, "user created");
        return Ok((
            UserAccount {
                user: candidate,
                credentials: None,
            },
            true,
        ));
    }
    let account = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::internal(format!("user {id} missing after insert")))?;
    Ok((account, false))
}

/// Service implementing [`UserAccounts`].
#[derive(Clone)]
pub struct UserAccountsService<U: ?Sized> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: ?Sized> UserAccountsService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U: ?Sized> UserAccounts for UserAccountsService<U>
where
    U: UserRepository,
{
    async fn ensure_user(&self, request: EnsureUserRequest) -> Result<EnsureUserResponse, Error> {
        let (account, created) = ensure_account(
            self.users.as_ref(),
            &request.user_id,
            &request.display_name,
            self.clock.utc(),
        )
        .await?;
        Ok(EnsureUserResponse {
            user: account.user,
            created,
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, Error> {
        let now = self.clock.utc();
        let (account, _) =
            ensure_account(self.users.as_ref(), &request.user_id, &request.display_name, now)
                .await?;

        let first_login = match account.credentials {
            None => {
                self.users
                    .set_credentials(&request.user_id, &request.credentials)
                    .await?;
                true
            }
            Some(stored) if stored == request.credentials => false,
            Some(_) => {
                info!(user_id = %request.user_id, "login rejected");
                return Err(Error::unauthorized("Invalid login credentials."));
            }
        };
        self.users.record_login(&request.user_id, now).await?;

        let mut user = account.user;
        user.last_login_at = Some(now);
        Ok(LoginResponse { user, first_login })
    }
}
