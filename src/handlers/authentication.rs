// Authentication middleware for the audio API
//
// This module provides the bearer token middleware guarding the upload
// endpoints. The configured bcrypt hash is injected at construction time
// and the presented key is re-verified on every request; no session state
// is kept between requests.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, ResponseError,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use log::warn;

use crate::error::HandlerError;
use crate::keys;

/// Middleware factory for authentication
pub struct Authentication {
    key_hash: Option<String>,
}

impl Authentication {
    /// Create the middleware with the bcrypt hash from configuration
    ///
    /// When no hash is configured every request is rejected; a missing
    /// credential never turns authentication off.
    pub fn new(key_hash: Option<String>) -> Self {
        Self { key_hash }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        if self.key_hash.is_none() {
            warn!("No API key hash is configured; all protected requests will be rejected");
        }
        ok(AuthenticationMiddleware {
            service,
            key_hash: self.key_hash.clone(),
        })
    }
}

/// Authentication middleware implementation
pub struct AuthenticationMiddleware<S> {
    service: S,
    key_hash: Option<String>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
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
        if let Err(e) = authenticate(&req, self.key_hash.as_deref()) {
            let (request, _) = req.into_parts();
            let response = e.error_response().map_into_right_body();
            return Box::pin(async move { Ok(ServiceResponse::new(request, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Authenticate a request by checking the Authorization header
///
/// The scheme prefix must be exactly "Bearer "; anything else counts as a
/// missing or malformed header.
fn authenticate(req: &ServiceRequest, key_hash: Option<&str>) -> Result<(), HandlerError> {
    let auth_str = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let token = match auth_str.strip_prefix("Bearer ") {
        Some(token) => token,
        None => {
            warn!("Missing or malformed Authorization header");
            return Err(HandlerError::InvalidAuthHeader);
        }
    };

    if token.is_empty() {
        warn!("Authorization header carries an empty API key");
        return Err(HandlerError::ApiKeyMissing);
    }

    let key_hash = match key_hash {
        Some(hash) => hash,
        None => {
            warn!("Rejecting request: no API key hash is configured");
            return Err(HandlerError::InvalidApiKey);
        }
    };

    if keys::verify_api_key(token, key_hash) {
        Ok(())
    } else {
        warn!("Rejecting request with invalid API key");
        Err(HandlerError::InvalidApiKey)
    }
}
