//! Meme upload handler.
//!
//! ```text
//! POST /api/proposals/{id}/meme  (multipart/form-data, field "file")
//! ```
//!
//! The body is read chunk by chunk and abandoned as soon as it passes the
//! meme size cap, so oversized uploads are never buffered whole.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpResponse, post, web};
use futures_util::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{MemeUpload, MemeUploadResponse};
use crate::domain::{Error, MAX_MEME_BYTES};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PROPOSAL_ID, parse_proposal_id};

const FILE_FIELD: &str = "file";

/// Multipart form accepted by the meme upload.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MemeForm {
    /// JPEG, PNG, GIF, or WebP image of at most 2 MiB.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Response body for a stored meme.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemeUploadBody {
    pub proposal_id: String,
    #[schema(example = "/media/memes/p1-0b6f.png")]
    pub meme_url: String,
}

impl From<MemeUploadResponse> for MemeUploadBody {
    fn from(response: MemeUploadResponse) -> Self {
        Self {
            proposal_id: response.proposal_id.into(),
            meme_url: response.meme_url,
        }
    }
}

fn malformed_multipart(err: &MultipartError) -> Error {
    debug!(error = %err, "multipart body rejected");
    Error::invalid_request("Malformed multipart body.")
}

fn too_large() -> Error {
    Error::invalid_request("File too large.")
}

/// Read a field into memory, failing once it exceeds `limit` bytes.
async fn read_capped(field: &mut Field, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|err| malformed_multipart(&err))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Pull the `file` field out of the form as (content type, bytes).
async fn file_field(mut payload: Multipart) -> Result<Option<(String, Vec<u8>)>, Error> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| malformed_multipart(&err))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_default();
        let bytes = read_capped(&mut field, MAX_MEME_BYTES).await?;
        return Ok(Some((content_type, bytes)));
    }
    Ok(None)
}

/// Attach a meme image to a proposal.
#[utoipa::path(
    post,
    path = "/api/proposals/{id}/meme",
    params(("id" = String, Path, description = "Proposal id")),
    request_body(content = MemeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Meme stored", body = MemeUploadBody),
        (status = 400, description = "Missing, oversized, or unsupported file", body = ErrorEnvelope),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["proposals"],
    operation_id = "uploadMeme"
)]
#[post("/api/proposals/{id}/meme")]
pub async fn upload_meme(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let proposal_id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let (content_type, bytes) = file_field(payload)
        .await?
        .ok_or_else(|| Error::invalid_request("No file uploaded."))?;
    let response = state
        .proposals_command
        .attach_meme(MemeUpload {
            proposal_id,
            content_type,
            bytes,
        })
        .await?;
    Ok(HttpResponse::Ok().json(MemeUploadBody::from(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::proposal_id;
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    const BOUNDARY: &str = "soapbox-test-boundary";

    fn form(field: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn upload(ports: MockPorts, body: Vec<u8>) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(upload_meme),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/api/proposals/p1/meme")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn oversized_upload_is_rejected_before_the_port() {
        let mut ports = MockPorts::default();
        ports.proposals_command.expect_attach_meme().never();

        let (status, body) = upload(ports, form("file", "image/jpeg", &vec![0xFF; 3_000_000])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File too large.");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_file_field_is_rejected() {
        let mut ports = MockPorts::default();
        ports.proposals_command.expect_attach_meme().never();

        let (status, body) = upload(ports, form("caption", "text/plain", b"hello")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file uploaded.");
    }

    #[rstest]
    #[actix_web::test]
    async fn file_is_forwarded_with_its_content_type() {
        let mut ports = MockPorts::default();
        ports
            .proposals_command
            .expect_attach_meme()
            .withf(|upload| upload.content_type == "image/png" && upload.bytes == b"png-bytes")
            .return_once(|upload| {
                Ok(MemeUploadResponse {
                    proposal_id: upload.proposal_id,
                    meme_url: "/media/memes/p1-x.png".into(),
                })
            });

        let (status, body) = upload(ports, form("file", "image/png", b"png-bytes")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["proposalId"], proposal_id("p1").as_str());
        assert_eq!(body["memeUrl"], "/media/memes/p1-x.png");
    }
}
