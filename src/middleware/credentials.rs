use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::InternalError, Error, FromRequest, HttpRequest, HttpResponse,
};
use secrecy::SecretString;
use serde_json::json;

/// Per-request wearable credentials from the X-Email/X-Password headers.
///
/// Missing headers answer 401; present-but-blank values answer 400. The
/// password never leaves the `SecretString` wrapper.
pub struct GarminCredentials {
    pub email: String,
    pub password: SecretString,
}

impl FromRequest for GarminCredentials {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let email = header_string(req, "X-Email");
        let password = header_string(req, "X-Password");

        let result = match (email, password) {
            (Some(email), Some(password)) => {
                if email.trim().is_empty() || password.trim().is_empty() {
                    Err(InternalError::from_response(
                        "invalid credentials format",
                        HttpResponse::BadRequest().json(json!({
                            "error": "Invalid credentials format",
                            "message": "Email and password must be non-empty strings"
                        })),
                    )
                    .into())
                } else {
                    Ok(GarminCredentials {
                        email,
                        password: SecretString::new(password.into_boxed_str()),
                    })
                }
            }
            _ => Err(InternalError::from_response(
                "missing credentials",
                HttpResponse::Unauthorized().json(json!({
                    "error": "Authentication required",
                    "message": "Please provide X-Email and X-Password headers"
                })),
            )
            .into()),
        };
        ready(result)
    }
}

fn header_string(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
