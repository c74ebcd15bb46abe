//! Users API handlers.
//!
//! ```text
//! POST /api/users {"userId":"u1","name":"Ada"}
//! POST /api/login {"userId":"u1","emojiCombination":"🦊🌵","firstSelectionId":"a","secondSelectionId":"b"}
//! ```

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{EnsureUserRequest, LoginRequest};
use crate::domain::{LoginCredentials, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, USER_ID, parse_display_name, parse_user_id, user_validation_error,
};

const NAME: FieldName = FieldName::new("name");

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(example = "u-7f3a")]
    pub id: String,
    #[schema(example = "Ada")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.display_name.to_string(),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Request body for `POST /api/users`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub user_id: Option<String>,
    /// Display name; blank or absent falls back to "Anonymous".
    pub name: Option<String>,
}

/// Response body for `POST /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnsureUserResponseBody {
    #[serde(flatten)]
    pub user: UserBody,
    /// Whether this call created the user.
    pub created: bool,
}

/// Create a user, or return the existing one with the same id.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserBody,
    responses(
        (status = 200, description = "User", body = EnsureUserResponseBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "ensureUser"
)]
#[post("/api/users")]
pub async fn ensure_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let CreateUserBody { user_id, name } = payload.into_inner();
    let request = EnsureUserRequest {
        user_id: parse_user_id(user_id, USER_ID)?,
        display_name: parse_display_name(name.as_deref(), NAME)?,
    };
    let response = state.users.ensure_user(request).await?;
    Ok(HttpResponse::Ok().json(EnsureUserResponseBody {
        user: response.user.into(),
        created: response.created,
    }))
}

/// Request body for `POST /api/login`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub emoji_combination: Option<String>,
    pub first_selection_id: Option<String>,
    pub second_selection_id: Option<String>,
}

/// Response body for `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseBody {
    #[serde(flatten)]
    pub user: UserBody,
    /// True when this attempt registered the credentials.
    pub first_login: bool,
}

/// Log in with an emoji combination and two selections.
///
/// The first login for a user id registers the credentials; later logins
/// must present the same ones.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = LoginResponseBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/api/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        body.emoji_combination.as_deref().unwrap_or_default(),
        body.first_selection_id.as_deref().unwrap_or_default(),
        body.second_selection_id.as_deref().unwrap_or_default(),
    )
    .map_err(|err| user_validation_error(NAME, &err))?;
    let request = LoginRequest {
        user_id: parse_user_id(body.user_id, USER_ID)?,
        display_name: parse_display_name(body.name.as_deref(), NAME)?,
        credentials,
    };
    let response = state.users.login(request).await?;
    Ok(HttpResponse::Ok().json(LoginResponseBody {
        user: response.user.into(),
        first_login: response.first_login,
    }))
}
