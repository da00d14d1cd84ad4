use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::jwt::JwtSettings;

/// Claims carried by a dashboard session token. The subject is the
/// dashboard user's email address.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DashboardClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn generate_dashboard_token(
    email: &str,
    settings: &JwtSettings,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(settings.expiration_hours);

    let claims = DashboardClaims {
        sub: email.to_owned(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.expose_secret().as_bytes()),
    )
}

pub fn decode_dashboard_token(
    token: &str,
    settings: &JwtSettings,
) -> Result<DashboardClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<DashboardClaims>(
        token,
        &DecodingKey::from_secret(settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(token_data.claims)
}
