//! Static front-end files served for every path no other route claims.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Default service: `GET /` serves `index.html`, anything else the file at
/// that path.
pub async fn static_asset(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let document = state.static_site.asset(req.path().to_owned()).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, document.content_type))
        .body(document.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::StaticDocument;
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    #[rstest]
    #[actix_web::test]
    async fn unmatched_paths_fall_through_to_documents() {
        let mut ports = MockPorts::default();
        ports
            .static_site
            .expect_asset()
            .withf(|path| path == "/assets/app.js")
            .return_once(|_| {
                Ok(StaticDocument {
                    content_type: "text/javascript".into(),
                    bytes: b"console.log(1)".to_vec(),
                })
            });
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_state())
                .default_service(web::get().to(static_asset)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/assets/app.js").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"text/javascript"[..])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_documents_are_not_found() {
        let mut ports = MockPorts::default();
        ports
            .static_site
            .expect_asset()
            .return_once(|_| Err(Error::not_found("Not found.")));
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_state())
                .default_service(web::get().to(static_asset)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/missing.txt").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
