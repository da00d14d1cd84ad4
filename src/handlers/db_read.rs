use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::auth::jwt::DashboardClaims;
use crate::db::{PgRecordStore, RecordStore};
use crate::models::sync::MetricFamily;
use crate::utils::dates;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub email: Option<String>,
    pub date: Option<String>,
}

/// Read one day of previously synced data by (email, date). Activities
/// answer every row stored for that day.
#[tracing::instrument(name = "Read stored data", skip(pool))]
pub async fn get_daily(
    path: web::Path<String>,
    query: web::Query<DailyQuery>,
    pool: web::Data<PgPool>,
) -> HttpResponse {
    let Some(family) = MetricFamily::from_route_key(&path) else {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("Unknown data type: {}", path)
        }));
    };
    let Some(email) = query.email.as_deref().filter(|e| !e.is_empty()) else {
        return HttpResponse::BadRequest().json(json!({"error": "Missing email parameter"}));
    };
    let Some(date_str) = query.date.as_deref().filter(|d| !d.is_empty()) else {
        return HttpResponse::BadRequest().json(json!({"error": "Missing date parameter"}));
    };
    let Some(date) = dates::parse_date(date_str) else {
        return HttpResponse::BadRequest()
            .json(json!({"error": "Invalid date format. Use YYYY-MM-DD"}));
    };

    let store = PgRecordStore::new(pool.get_ref().clone());
    match store.find_daily(family, email, date).await {
        Ok(Some(data)) => HttpResponse::Ok().json(json!({
            "date": date_str,
            "email": email,
            "data_type": family.route_key(),
            "data": data,
            "source": "database",
        })),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "error": "No data found",
            "message": format!(
                "No {} data found for {} on {}",
                family.route_key(), email, date_str
            ),
        })),
        Err(e) => {
            tracing::error!("database error reading {}: {e}", family.route_key());
            HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error",
                "message": e.to_string(),
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Read an inclusive date range of stored data for the dashboard user.
/// The `EMAIL` environment variable overrides the token subject, so the
/// dashboard account can differ from the wearable account.
#[tracing::instrument(name = "Read stored data range", skip(pool, claims))]
pub async fn get_range(
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<DashboardClaims>,
) -> HttpResponse {
    let Some(family) = MetricFamily::from_route_key(&path) else {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("Unknown data type: {}", path)
        }));
    };
    let (Some(start_str), Some(end_str)) = (query.start_date.as_deref(), query.end_date.as_deref())
    else {
        return HttpResponse::BadRequest()
            .json(json!({"error": "Missing start_date or end_date parameter"}));
    };
    let (Some(start), Some(end)) = (dates::parse_date(start_str), dates::parse_date(end_str))
    else {
        return HttpResponse::BadRequest()
            .json(json!({"error": "Invalid date format. Use YYYY-MM-DD"}));
    };

    let email = std::env::var("EMAIL").unwrap_or_else(|_| claims.sub.clone());

    let store = PgRecordStore::new(pool.get_ref().clone());
    match store.find_range(family, &email, start, end).await {
        Ok(data) => HttpResponse::Ok().json(json!({
            "count": data.len(),
            "data": data,
            "data_type": family.route_key(),
            "start_date": start_str,
            "end_date": end_str,
            "source": "database",
        })),
        Err(e) => {
            tracing::error!("database error reading {} range: {e}", family.route_key());
            HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error",
                "message": e.to_string(),
            }))
        }
    }
}
