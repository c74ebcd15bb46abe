//! CORS, caching, tracing, and static fallback behaviour of the assembled app.

mod support;

use actix_web::dev::ServiceResponse;
use actix_web::http::{Method, StatusCode, header};
use actix_web::test::{self, TestRequest};
use rstest::rstest;

use support::{INDEX_HTML, init_app, static_dir};

fn header_value<B>(response: &ServiceResponse<B>, name: header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[rstest]
#[case("/api/proposals")]
#[case("/api/votes")]
#[case("/media/memes/anything.png")]
#[case("/no/such/page")]
#[actix_web::test]
async fn preflight_is_answered_on_any_path(#[case] path: &str) {
    let dir = static_dir();
    let app = init_app(&dir).await;

    let response = test::call_service(
        &app,
        TestRequest::default()
            .method(Method::OPTIONS)
            .uri(path)
            .insert_header((header::ORIGIN, "https://client.example"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        header_value(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
        Some("*")
    );
    assert_eq!(
        header_value(&response, header::ACCESS_CONTROL_ALLOW_METHODS).as_deref(),
        Some("GET, POST, PUT, DELETE, OPTIONS")
    );
    assert_eq!(
        header_value(&response, header::ACCESS_CONTROL_MAX_AGE).as_deref(),
        Some("86400")
    );
}

#[rstest]
#[case("/api/health", "no-store")]
#[case("/health/ready", "no-store")]
#[case("/api/proposals", "no-cache, no-store, must-revalidate")]
#[case("/assets/app.js", "public, max-age=31536000, immutable")]
#[case("/", "public, max-age=3600")]
#[actix_web::test]
async fn cache_control_follows_the_path(#[case] path: &str, #[case] expected: &str) {
    let dir = static_dir();
    let app = init_app(&dir).await;

    let response = test::call_service(&app, TestRequest::get().uri(path).to_request()).await;

    assert!(response.status().is_success(), "{path} -> {}", response.status());
    assert_eq!(
        header_value(&response, header::CACHE_CONTROL).as_deref(),
        Some(expected)
    );
}

#[rstest]
#[case("/media/memes/missing.png")]
#[case("/api/proposals/nope/share-image")]
#[case("/proposals-missing.txt")]
#[actix_web::test]
async fn error_responses_are_not_cached(#[case] path: &str) {
    let dir = static_dir();
    let app = init_app(&dir).await;

    let response = test::call_service(&app, TestRequest::get().uri(path).to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    assert_eq!(
        header_value(&response, header::CACHE_CONTROL).as_deref(),
        Some("no-store")
    );
}

#[rstest]
#[actix_web::test]
async fn error_responses_still_carry_cors_and_trace_headers() {
    let dir = static_dir();
    let app = init_app(&dir).await;

    let response = test::call_service(
        &app,
        TestRequest::get().uri("/api/proposals/missing").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        header_value(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
        Some("*")
    );
    assert!(response.headers().contains_key("trace-id"));
}

#[rstest]
#[actix_web::test]
async fn root_serves_the_index_document() {
    let dir = static_dir();
    let app = init_app(&dir).await;

    let response = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, header::CONTENT_TYPE).as_deref(),
        Some("text/html; charset=utf-8")
    );
    let body = test::read_body(response).await;
    assert_eq!(body, INDEX_HTML.as_bytes());
}

#[rstest]
#[actix_web::test]
async fn bundled_assets_keep_their_content_type() {
    let dir = static_dir();
    let app = init_app(&dir).await;

    let response =
        test::call_service(&app, TestRequest::get().uri("/assets/app.js").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = header_value(&response, header::CONTENT_TYPE).expect("content type");
    assert!(content_type.contains("javascript"), "{content_type}");
}

#[rstest]
#[actix_web::test]
async fn missing_static_files_are_not_found() {
    let dir = static_dir();
    let app = init_app(&dir).await;

    let response =
        test::call_service(&app, TestRequest::get().uri("/missing.txt").to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
