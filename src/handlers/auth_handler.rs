use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use serde_json::json;

use crate::auth::jwt::{generate_dashboard_token, DashboardClaims};
use crate::config::jwt::JwtSettings;
use crate::config::settings::DashboardSettings;
use crate::models::auth::{DashboardLoginRequest, DashboardLoginResponse};

/// Dashboard login for the single configured user. A matching email and
/// bcrypt-verified password answer a signed session token.
#[tracing::instrument(name = "Dashboard login", skip_all)]
pub async fn dashboard_login(
    body: web::Json<DashboardLoginRequest>,
    dashboard: web::Data<DashboardSettings>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    let email = body.email.trim().to_lowercase();
    if email != dashboard.email.to_lowercase() {
        return HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"}));
    }

    let password_ok = bcrypt::verify(
        &body.password,
        dashboard.password_hash.expose_secret(),
    )
    .unwrap_or(false);
    if !password_ok {
        return HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"}));
    }

    match generate_dashboard_token(&email, &jwt_settings) {
        Ok(token) => {
            tracing::info!("dashboard login succeeded for {email}");
            HttpResponse::Ok().json(DashboardLoginResponse {
                token,
                email,
                expires_in: jwt_settings.expiration_hours * 3600,
            })
        }
        Err(e) => {
            tracing::error!("failed to issue dashboard token: {e}");
            HttpResponse::InternalServerError().json(json!({"error": "Failed to issue token"}))
        }
    }
}

/// Reaching this handler at all means the middleware accepted the token.
pub async fn verify_token(claims: web::ReqData<DashboardClaims>) -> HttpResponse {
    HttpResponse::Ok().json(json!({"valid": true, "email": claims.sub}))
}
