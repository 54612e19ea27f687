//! Per-client throttle for the credential endpoints.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::RETRY_AFTER;
use actix_web::{Error, HttpResponse};
use futures::future::LocalBoxFuture;

use postly_core::ports::{RateLimiter, Throttle};
use postly_shared::ApiResponse;

/// Wraps a resource so each client address gets its own allowance.
/// Keys are `<scope>:<client ip>`, so two wrapped resources sharing a
/// scope also share a budget.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    scope: &'static str,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>, scope: &'static str) -> Self {
        Self { limiter, scope }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ThrottledService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ThrottledService {
            service,
            limiter: self.limiter.clone(),
            scope: self.scope,
        }))
    }
}

pub struct ThrottledService<S> {
    service: S,
    limiter: Arc<dyn RateLimiter>,
    scope: &'static str,
}

impl<S, B> Service<ServiceRequest> for ThrottledService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = format!(
            "{}:{}",
            self.scope,
            req.connection_info().realip_remote_addr().unwrap_or("unknown")
        );

        match self.limiter.hit(&key) {
            Throttle::Allowed { .. } => {
                let pending = self.service.call(req);
                Box::pin(async move { Ok(pending.await?.map_into_left_body()) })
            }
            Throttle::Limited { retry_after } => {
                let seconds = retry_after.as_secs().max(1);
                tracing::warn!(key = %key, retry_after = seconds, "Throttled");

                let response = HttpResponse::TooManyRequests()
                    .insert_header((RETRY_AFTER, seconds.to_string()))
                    .json(ApiResponse::error_message(
                        429,
                        format!("Too many attempts. Try again in {seconds} seconds."),
                    ));
                let refused = req.into_response(response).map_into_right_body();
                Box::pin(ready(Ok(refused)))
            }
        }
    }
}
