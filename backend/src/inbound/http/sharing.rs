//! Social sharing handlers: the rendered share card and the meta-tagged
//! share page.
//!
//! ```text
//! GET /api/proposals/{id}/share-image
//! GET /proposals/{id}
//! ```

use actix_web::http::header::{self, ETag, EntityTag, IfNoneMatch};
use actix_web::{HttpMessage as _, HttpRequest, HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PROPOSAL_ID, parse_proposal_id};

const SVG: &str = "image/svg+xml";
const HTML: &str = "text/html; charset=utf-8";

fn not_modified(req: &HttpRequest, tag: &EntityTag) -> bool {
    match req.get_header::<IfNoneMatch>() {
        Some(IfNoneMatch::Any) => true,
        Some(IfNoneMatch::Items(items)) => items.iter().any(|item| item.weak_eq(tag)),
        None => false,
    }
}

/// Render the 1200x630 SVG share card for a proposal.
#[utoipa::path(
    get,
    path = "/api/proposals/{id}/share-image",
    params(("id" = String, Path, description = "Proposal id")),
    responses(
        (status = 200, description = "SVG share card", content_type = "image/svg+xml", body = String,
            headers(("ETag" = String, description = "SHA-256 of the SVG"))),
        (status = 304, description = "Card unchanged since the supplied ETag"),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["sharing"],
    operation_id = "shareImage"
)]
#[get("/api/proposals/{id}/share-image")]
pub async fn share_image(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let image = state.sharing.share_image(id).await?;
    let tag = EntityTag::new_strong(image.etag);
    if not_modified(&req, &tag) {
        return Ok(HttpResponse::NotModified().insert_header(ETag(tag)).finish());
    }
    Ok(HttpResponse::Ok()
        .content_type(SVG)
        .insert_header(ETag(tag))
        .body(image.svg))
}

/// Origin used for absolute share URLs.
fn base_url(state: &HttpState, req: &HttpRequest) -> String {
    match &state.public_base_url {
        Some(url) => url.to_string(),
        None => {
            let info = req.connection_info();
            format!("{}://{}/", info.scheme(), info.host())
        }
    }
}

/// Serve `index.html` with share meta tags for the proposal.
///
/// Unknown proposals get the unmodified document so the front end can
/// render its own not-found view.
#[utoipa::path(
    get,
    path = "/proposals/{id}",
    params(("id" = String, Path, description = "Proposal id")),
    responses(
        (status = 200, description = "Share page", content_type = "text/html", body = String),
        (status = 404, description = "Front-end document missing", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["sharing"],
    operation_id = "sharePage"
)]
#[get("/proposals/{id}")]
pub async fn share_page(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let html = state.sharing.share_page(id, base_url(&state, &req)).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, HTML))
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::ShareImage;
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use url::Url;

    fn image() -> ShareImage {
        ShareImage {
            svg: "<svg/>".into(),
            etag: "abc123".into(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn share_image_is_svg_with_strong_etag() {
        let mut ports = MockPorts::default();
        ports.sharing.expect_share_image().return_once(|_| Ok(image()));
        let app = actix_test::init_service(
            App::new().app_data(ports.into_state()).service(share_image),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/proposals/p1/share-image")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(SVG.as_bytes())
        );
        assert_eq!(
            response.headers().get(header::ETAG).map(|v| v.as_bytes()),
            Some(&b"\"abc123\""[..])
        );
        assert_eq!(actix_test::read_body(response).await, "<svg/>");
    }

    #[rstest]
    #[actix_web::test]
    async fn matching_etag_is_not_modified() {
        let mut ports = MockPorts::default();
        ports.sharing.expect_share_image().return_once(|_| Ok(image()));
        let app = actix_test::init_service(
            App::new().app_data(ports.into_state()).service(share_image),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/proposals/p1/share-image")
                .insert_header((header::IF_NONE_MATCH, "\"abc123\""))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_proposal_share_image_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .sharing
            .expect_share_image()
            .return_once(|_| Err(Error::not_found("Proposal not found.")));
        let app = actix_test::init_service(
            App::new().app_data(ports.into_state()).service(share_image),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/proposals/zz/share-image")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case(None, "http://soapbox.test/")]
    #[case(Some("https://soapbox.example/"), "https://soapbox.example/")]
    #[actix_web::test]
    async fn share_page_base_url_prefers_configuration(
        #[case] configured: Option<&str>,
        #[case] expected: &'static str,
    ) {
        let mut ports = MockPorts::default();
        ports
            .sharing
            .expect_share_page()
            .withf(move |id, base| id.as_str() == "p1" && base == expected)
            .return_once(|_, _| Ok("<html></html>".into()));
        let state = ports.into_state();
        let state = web::Data::new(
            state
                .get_ref()
                .clone()
                .with_public_base_url(configured.map(|raw| Url::parse(raw).expect("url"))),
        );
        let app =
            actix_test::init_service(App::new().app_data(state).service(share_page)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/proposals/p1")
                .insert_header((header::HOST, "soapbox.test"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(HTML.as_bytes())
        );
    }
}
