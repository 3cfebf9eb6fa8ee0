//! Bearer token authentication.
//!
//! Reads the `Authorization` header, verifies the token with the [`TokenVerifier`] registered as app data and stores
//! the decoded [`JwtClaims`] in the request extensions. Requests that fail verification never reach the wrapped
//! service; they get an error response carrying the failure `code`.
use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
    HttpMessage,
};
use futures::future::{ok, Ready};
use log::*;

use crate::{
    auth::{extract_bearer_token, JwtClaims, TokenVerifier},
    errors::{AuthError, ServerError},
};

pub struct JwtAuthMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtAuthMiddlewareService { service: Rc::new(service) })
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let Some(verifier) = req.app_data::<web::Data<TokenVerifier>>().cloned() else {
                let err = ServerError::ConfigurationError("No token verifier has been registered.".into());
                return Ok(req.error_response(err).map_into_right_body());
            };
            match authenticate(&req, &verifier).await {
                Ok(claims) => {
                    trace!("🔐️ Request to {} authenticated for {}", req.path(), claims.sub);
                    req.extensions_mut().insert(claims);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => {
                    debug!("🔐️ Request to {} was not authenticated. {e}", req.path());
                    Ok(req.error_response(ServerError::from(e)).map_into_right_body())
                },
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest, verifier: &TokenVerifier) -> Result<JwtClaims, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::MalformedHeader("Header is not valid text.".into())))
        .transpose()?;
    let token = extract_bearer_token(header)?;
    verifier.verify(token).await
}
