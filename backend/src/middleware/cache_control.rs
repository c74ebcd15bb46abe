//! Cache-Control selection from the [`RouterPolicy`] table.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use super::RouterPolicy;
use super::policy::NO_STORE;

/// Adds a `Cache-Control` header chosen by request path.
///
/// A header already set by the handler is left untouched. Only successful
/// and `304` responses use the path table; everything else is `no-store`.
#[derive(Clone)]
pub struct CacheControl {
    policy: Arc<RouterPolicy>,
}

impl CacheControl {
    pub fn new(policy: Arc<RouterPolicy>) -> Self {
        Self { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CacheControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CacheControlMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CacheControlMiddleware {
            service,
            policy: Arc::clone(&self.policy),
        }))
    }
}

fn cacheable_value(status: StatusCode, value: &'static str) -> &'static str {
    if status.is_success() || status == StatusCode::NOT_MODIFIED {
        value
    } else {
        NO_STORE
    }
}

/// Service wrapper produced by [`CacheControl`].
pub struct CacheControlMiddleware<S> {
    service: S,
    policy: Arc<RouterPolicy>,
}

impl<S, B> Service<ServiceRequest> for CacheControlMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let value = self.policy.cache_control_for(req.path());
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            let value = cacheable_value(res.status(), value);
            let headers = res.headers_mut();
            if !headers.contains_key(CACHE_CONTROL) {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static(value));
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn cache_header_for(path: &str) -> Option<String> {
        let app = test::init_service(
            App::new()
                .wrap(CacheControl::new(Arc::new(RouterPolicy::default())))
                .default_service(web::to(|| async { HttpResponse::Ok().finish() }))
                .route(
                    "/media/missing.png",
                    web::get().to(|| async { HttpResponse::NotFound().finish() }),
                )
                .route(
                    "/api/proposals/p1/share-image",
                    web::get().to(|| async { HttpResponse::NotModified().finish() }),
                )
                .route(
                    "/proposals/broken",
                    web::get().to(|| async { HttpResponse::InternalServerError().finish() }),
                )
                .route(
                    "/custom",
                    web::get().to(|| async {
                        HttpResponse::Ok()
                            .insert_header((CACHE_CONTROL, "private"))
                            .finish()
                    }),
                ),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        res.headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[rstest]
    #[case("/api/health", "no-store")]
    #[case("/api/proposals/p1/share-image", "public, max-age=3600")]
    #[case("/api/proposals", "no-cache, no-store, must-revalidate")]
    #[case("/media/memes/a.png", "public, max-age=31536000, immutable")]
    #[case("/proposals/p1", "public, max-age=300")]
    #[case("/custom", "private")]
    #[case("/media/missing.png", "no-store")]
    #[case("/proposals/broken", "no-store")]
    #[actix_web::test]
    async fn selects_header_by_path(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(cache_header_for(path).await.as_deref(), Some(expected));
    }
}
