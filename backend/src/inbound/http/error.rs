//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{error, details?}` envelope
//! with consistent status codes.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned in place of any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Human-readable message.
    #[schema(example = "Proposal not found.")]
    pub error: String,
    /// Structured context such as the offending field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(err: &Error) -> Self {
        match err.code() {
            ErrorCode::InternalError => Self {
                error: INTERNAL_ERROR_MESSAGE.to_owned(),
                details: None,
            },
            _ => Self {
                error: err.message().to_owned(),
                details: err.details().cloned(),
            },
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                trace_id = self.trace_id().unwrap_or_default(),
                code = self.code().as_str(),
                message = self.message(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope::from(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_ERROR_MESSAGE)
    }
}

fn malformed(kind: &'static str, err: &dyn std::fmt::Display) -> actix_web::Error {
    warn!(kind, error = %err, "rejected malformed request");
    Error::invalid_request(format!("Malformed {kind}."))
        .with_details(json!({ "code": "malformed_request", "reason": err.to_string() }))
        .into()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed("JSON body", &err)
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed("query string", &err)
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    malformed("path", &err)
}

/// JSON extractor configuration emitting the 400 envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Query extractor configuration emitting the 400 envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

/// Path extractor configuration emitting the 400 envelope.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}
