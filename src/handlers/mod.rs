pub mod auth_handler;
pub mod backend_health;
pub mod db_read;
pub mod explain;
pub mod live;
pub mod metrics;
pub mod sync_handler;

use actix_web::HttpResponse;
use serde_json::json;

use crate::errors::ProviderError;

/// Translate a provider failure into the response contract: 401 for
/// rejected credentials, 503 for connectivity, 429 for rate limiting,
/// 500 for everything unexpected.
pub fn provider_error_response(err: &ProviderError) -> HttpResponse {
    match err {
        ProviderError::Auth => HttpResponse::Unauthorized().json(json!({
            "error": "Authentication failed",
            "message": "Invalid wearable credentials"
        })),
        ProviderError::Connectivity(_) => HttpResponse::ServiceUnavailable().json(json!({
            "error": "Connection error",
            "message": "Unable to connect to the wearable-data provider"
        })),
        ProviderError::RateLimited => HttpResponse::TooManyRequests().json(json!({
            "error": "Rate limit exceeded",
            "message": "Too many requests. Please try again later."
        })),
        ProviderError::Upstream(message) | ProviderError::Decode(message) => {
            HttpResponse::InternalServerError().json(json!({
                "error": "Provider service error",
                "message": message
            }))
        }
    }
}
