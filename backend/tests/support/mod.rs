//! Shared helpers for router integration tests.
//!
//! Each test builds the real application over the in-memory adapters and a
//! temporary static directory, so requests travel through every middleware
//! layer exactly as they would in production.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::fs;
use std::net::SocketAddr;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::web;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

use soapbox::inbound::http::health::HealthState;
use soapbox::server::{AppDependencies, ServerConfig, build_app, build_http_state};
use soapbox::settings::StaticSource;

pub const INDEX_HTML: &str = concat!(
    "<!doctype html>\n<html><head>\n",
    "<title>Soapbox</title>\n",
    "<meta property=\"og:title\" content=\"Soapbox\">\n",
    "<meta name=\"twitter:card\" content=\"summary\">\n",
    "</head><body><div id=\"root\"></div></body></html>\n"
);

pub const PUBLIC_BASE_URL: &str = "https://soapbox.example/";

/// Static directory holding `index.html` and one bundled asset.
pub fn static_dir() -> TempDir {
    let dir = TempDir::new().expect("create static dir");
    fs::write(dir.path().join("index.html"), INDEX_HTML).expect("write index.html");
    fs::create_dir_all(dir.path().join("assets")).expect("create assets dir");
    fs::write(dir.path().join("assets/app.js"), "console.log('soapbox');").expect("write asset");
    dir
}

/// Application dependencies over the in-memory adapters.
pub fn dependencies(static_dir: &TempDir) -> AppDependencies {
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("socket addr");
    let config = ServerConfig::new(addr, StaticSource::Directory(static_dir.path().to_path_buf()))
        .with_public_base_url(Some(Url::parse(PUBLIC_BASE_URL).expect("base url")));
    let http_state = build_http_state(&config).expect("http state");
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    AppDependencies {
        health_state,
        http_state,
        policy: config.policy(),
    }
}

/// Initialise the full application for a static directory.
pub async fn init_app(
    static_dir: &TempDir,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(build_app(dependencies(static_dir))).await
}

/// Send a request and decode the JSON body.
pub async fn call_json<S, B>(app: &S, request: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    (status, value)
}

pub async fn post_json<S, B>(app: &S, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call_json(app, TestRequest::post().uri(uri).set_json(body).to_request()).await
}

pub async fn get_json<S, B>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call_json(app, TestRequest::get().uri(uri).to_request()).await
}

/// Register a user and return their id.
pub async fn ensure_user<S, B>(app: &S, user_id: &str, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) =
        post_json(app, "/api/users", json!({ "userId": user_id, "name": name })).await;
    assert_eq!(status, StatusCode::OK, "ensure user failed: {body}");
    body["id"].as_str().expect("user id").to_owned()
}

/// Create a proposal and return its id.
pub async fn create_proposal<S, B>(app: &S, user_id: &str, text: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post_json(
        app,
        "/api/proposals",
        json!({ "userId": user_id, "userName": "Ada", "text": text }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create proposal failed: {body}");
    body["id"].as_str().expect("proposal id").to_owned()
}

/// Multipart body with a single `file` part.
pub fn multipart_file(boundary: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"meme\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
