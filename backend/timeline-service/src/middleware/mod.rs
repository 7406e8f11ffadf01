//! HTTP middleware for the timeline service
//!
//! Credential verification happens at the gateway; requests arrive with the
//! already-verified caller id in the `x-user-id` header. The middleware
//! lifts that id into request extensions so handlers can extract it without
//! touching headers themselves.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Header carrying the gateway-verified caller id
pub const IDENTITY_HEADER: &str = "x-user-id";

/// Extracted caller identifier stored in request extensions.
/// Extraction fails with 401 when the request carries no identity.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

/// Optional viewer identity for read endpoints that personalize output
/// but do not require authentication.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<Uuid>);

/// Actix middleware that parses the identity header into extensions
pub struct IdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // A request without the header is anonymous; a malformed header
            // is rejected outright.
            if let Some(raw) = req.headers().get(IDENTITY_HEADER) {
                let raw = raw
                    .to_str()
                    .map_err(|_| ErrorUnauthorized("invalid identity header"))?;
                let user_id = Uuid::parse_str(raw)
                    .map_err(|_| ErrorUnauthorized("invalid identity header"))?;

                req.extensions_mut().insert(UserId(user_id));
            }

            service.call(req).await
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .ok_or_else(|| ErrorUnauthorized("authentication required")),
        )
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(Viewer(
            req.extensions().get::<UserId>().map(|user| user.0),
        )))
    }
}
