use std::future::Future;
use std::pin::Pin;

use actix_web::{
    dev::{Service, ServiceRequest, Transform},
    Error, HttpMessage,
};
use uuid::Uuid;

use crate::context::UserInfo;
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error as AppError;
use crate::impls::tokener::jwt::{Claim, JWT};

/// Pulls the profile id out of `Authorization: Bearer <token>`.
fn authenticate(tokener: &JWT, req: &ServiceRequest) -> Result<UserInfo, AppError> {
    let header = req.headers().get("Authorization").ok_or(AppError::Unauthorized)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)?;
    let claim: Claim = tokener.verify_token(token)?;
    let id = claim.user().parse::<Uuid>().map_err(|_| AppError::Unauthorized)?;
    Ok(UserInfo { id })
}

pub(crate) struct JWTMiddleware {
    secret: Vec<u8>,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;
    fn new_transform(&self, service: S) -> Self::Future {
        let secret = self.secret.clone();
        Box::pin(async move {
            Ok(JWTService {
                tokener: JWT::new(secret),
                next_service: service,
            })
        })
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: S,
}

impl<S> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&self.tokener, &req) {
            Err(e) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), e);
                Box::pin(async move { Err(e.into()) })
            }
            Ok(user) => {
                req.extensions_mut().insert(user);
                let res_fut = self.next_service.call(req);
                Box::pin(async move {
                    let resp = res_fut.await.map_err(|e| e.into())?;
                    Ok(resp)
                })
            }
        }
    }
}
