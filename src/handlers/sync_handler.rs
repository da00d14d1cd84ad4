use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use super::provider_error_response;
use crate::config::settings::GatewaySettings;
use crate::db::PgRecordStore;
use crate::middleware::credentials::GarminCredentials;
use crate::provider::gateway::GarminGateway;
use crate::sync::SyncEngine;
use crate::utils::dates;

/// Full sync of every metric family for an explicit date. Partial failures
/// still answer 200 — the report spells out each family's outcome; only a
/// credential rejection or a malformed date aborts the request.
#[tracing::instrument(
    name = "Sync date to database",
    skip_all,
    fields(email = %credentials.email, date = %path)
)]
pub async fn sync_date(
    path: web::Path<String>,
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let Some(date) = dates::parse_date(&path) else {
        return HttpResponse::BadRequest().json(json!({
            "error": "Invalid date format",
            "message": "Date must be in format YYYY-MM-DD (e.g., 2026-01-15)"
        }));
    };

    let provider = GarminGateway::new(
        &gateway,
        credentials.email.clone(),
        credentials.password.clone(),
    );
    let store = PgRecordStore::new(pool.get_ref().clone());
    let engine = SyncEngine::new(&provider, &store);

    match engine.sync_day(&credentials.email, date).await {
        Ok(report) => {
            let message = if report.is_full_success() {
                format!("Successfully synced all data for {date}")
            } else {
                format!("Sync for {date} completed with partial failures")
            };
            tracing::info!("{message}");
            HttpResponse::Ok().json(json!({
                "date": report.date,
                "email": report.email,
                "sync_status": report.sync_status,
                "summary": report.summary,
                "message": message,
            }))
        }
        Err(e) => provider_error_response(&e),
    }
}
