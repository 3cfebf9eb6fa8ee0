//! Permission checks for protected routes.
//!
//! This middleware must sit inside [`super::JwtAuthMiddlewareFactory`], which leaves the verified claims in the
//! request extensions. The request is allowed through only if the claims grant the route's required permission.

use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::{ok, Ready};
use log::*;

use crate::{
    auth::{check_permission, JwtClaims},
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    required_permission: String,
}

impl AclMiddlewareFactory {
    pub fn new(required_permission: &str) -> Self {
        AclMiddlewareFactory { required_permission: required_permission.to_string() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let required_permission = Rc::from(self.required_permission.as_str());
        ok(AclMiddlewareService { required_permission, service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_permission: Rc<str>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        let required_permission = Rc::clone(&self.required_permission);
        Box::pin(async move {
            let result = match req.extensions().get::<JwtClaims>() {
                Some(claims) => check_permission(claims, &required_permission),
                None => {
                    warn!("🔐️ No token claims found in request extensions");
                    Err(AuthError::MissingHeader)
                },
            };
            match result {
                Ok(()) => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Err(e) => {
                    debug!("🔐️ Access to {} denied. {e}", req.path());
                    Ok(req.error_response(ServerError::from(e)).map_into_right_body())
                },
            }
        })
    }
}
