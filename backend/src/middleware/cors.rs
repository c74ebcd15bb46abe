//! CORS middleware answering preflights and decorating every response.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use super::RouterPolicy;

/// Applies the [`RouterPolicy`] CORS headers.
///
/// `OPTIONS` requests on any path are answered here with `204 No Content`
/// and never reach a handler.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use soapbox::middleware::{Cors, RouterPolicy};
///
/// let app = App::new().wrap(Cors::new(RouterPolicy::default().into()));
/// ```
#[derive(Clone)]
pub struct Cors {
    policy: Arc<RouterPolicy>,
}

impl Cors {
    pub fn new(policy: Arc<RouterPolicy>) -> Self {
        Self { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware {
            service,
            policy: Arc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`Cors`].
pub struct CorsMiddleware<S> {
    service: S,
    policy: Arc<RouterPolicy>,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let policy = Arc::clone(&self.policy);
        if req.method() == Method::OPTIONS {
            let mut preflight = HttpResponse::NoContent().finish();
            policy.apply_cors(preflight.headers_mut());
            let res = req.into_response(preflight).map_into_right_body();
            return Box::pin(ready(Ok(res)));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            policy.apply_cors(res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}
