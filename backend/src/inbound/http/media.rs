//! Blob proxy handlers under `/media`.
//!
//! ```text
//! GET /media/memes/p1-0b6f.png
//! PUT /media/audio/clip.m4a  (raw body, at most 10 MiB)
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, put, web};
use futures_util::StreamExt as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, MAX_MEDIA_BYTES, MediaKey};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

fn media_not_found() -> Error {
    Error::not_found("Media not found.")
}

/// Fetch a stored blob.
#[utoipa::path(
    get,
    path = "/media/{key}",
    params(("key" = String, Path, description = "Relative media key such as memes/p1.png")),
    responses(
        (status = 200, description = "Blob bytes with inferred content type", body = Vec<u8>),
        (status = 404, description = "Media not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["media"],
    operation_id = "getMedia"
)]
#[get("/media/{key:.*}")]
pub async fn get_media(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let key = MediaKey::new(path.into_inner()).map_err(|_| media_not_found())?;
    let object = state.media.fetch(key).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, object.content_type))
        .body(object.bytes))
}

/// Response body for a stored blob.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaStoredBody {
    #[schema(example = "audio/clip.m4a")]
    pub key: String,
    #[schema(example = "/media/audio/clip.m4a")]
    pub url: String,
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            Error::invalid_request("Malformed request body.")
                .with_details(json!({ "reason": err.to_string() }))
        })?;
        if bytes.len() + chunk.len() > limit {
            return Err(Error::invalid_request("File too large."));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Store a blob under the given key.
///
/// The request `Content-Type` is ignored; reads serve the type implied by
/// the key's extension.
#[utoipa::path(
    put,
    path = "/media/{key}",
    params(("key" = String, Path, description = "Relative media key")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Stored", body = MediaStoredBody),
        (status = 400, description = "Invalid key or body too large", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["media"],
    operation_id = "putMedia"
)]
#[put("/media/{key:.*}")]
pub async fn put_media(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let key = MediaKey::new(raw.as_str()).map_err(|err| {
        Error::invalid_request("Invalid media key.")
            .with_details(json!({ "field": "key", "value": raw, "reason": err.to_string() }))
    })?;
    let bytes = read_body(payload, MAX_MEDIA_BYTES).await?;
    let url = state.media.store(key.clone(), bytes).await?;
    Ok(HttpResponse::Ok().json(MediaStoredBody {
        key: key.as_str().to_owned(),
        url,
    }))
}
