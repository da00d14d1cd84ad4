use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header,
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::errors::ErrorKind;
use serde_json::json;

use crate::auth::jwt::{decode_dashboard_token, DashboardClaims};
use crate::config::jwt::JwtSettings;

/// Validate the Bearer token on a dashboard request and hand back the
/// decoded claims. Expired tokens get a distinct error code so the
/// frontend can prompt for a fresh login instead of showing a failure.
pub fn validate_dashboard_request(req: &ServiceRequest) -> Result<DashboardClaims, Error> {
    let jwt_settings = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| unauthorized("Missing or invalid authorization header"))?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if !auth_header.starts_with("Bearer ") {
        return Err(unauthorized("Missing or invalid authorization header"));
    }

    let token = auth_header[7..].trim();
    decode_dashboard_token(token, jwt_settings).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => InternalError::from_response(
            "token expired",
            HttpResponse::Unauthorized().json(json!({
                "error": "Token expired",
                "code": "TOKEN_EXPIRED"
            })),
        )
        .into(),
        _ => unauthorized("Invalid token"),
    })
}

fn unauthorized(message: &'static str) -> Error {
    InternalError::from_response(
        message,
        HttpResponse::Unauthorized().json(json!({"error": message})),
    )
    .into()
}

pub struct DashboardAuth;

impl<S, B> Transform<S, ServiceRequest> for DashboardAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = DashboardAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DashboardAuthService { service }))
    }
}

pub struct DashboardAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for DashboardAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match validate_dashboard_request(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e) }),
        };

        // Hand the claims to the handler through the request extensions.
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}
