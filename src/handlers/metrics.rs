use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use super::provider_error_response;
use crate::config::settings::GatewaySettings;
use crate::db::{PgRecordStore, RecordStore};
use crate::middleware::credentials::GarminCredentials;
use crate::provider::gateway::GarminGateway;
use crate::provider::FitnessProvider;
use crate::resolve;
use crate::sync::fetch_health_payloads;
use crate::utils::dates;

fn gateway_for(settings: &GatewaySettings, credentials: &GarminCredentials) -> GarminGateway {
    GarminGateway::new(
        settings,
        credentials.email.clone(),
        credentials.password.clone(),
    )
}

/// The read endpoints report on yesterday, and opportunistically upsert the
/// family they just fetched; a storage failure is logged and never fails
/// the read.
#[tracing::instrument(name = "Fetch steps", skip_all, fields(email = %credentials.email))]
pub async fn steps(
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let provider = gateway_for(&gateway, &credentials);

    let steps_raw = match provider.steps(date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let user_summary = match provider.user_summary(date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };

    let record = resolve::steps::record(&credentials.email, date, &steps_raw, &user_summary);
    let store = PgRecordStore::new(pool.get_ref().clone());
    if let Err(e) = store.upsert_steps(&record).await {
        tracing::error!("failed to store steps data: {e}");
    }

    HttpResponse::Ok().json(json!({
        "date": date,
        "total_steps": record.total_steps,
        "hourly_data": record.hourly_data,
        "user_summary": user_summary,
    }))
}

#[tracing::instrument(name = "Fetch heart rate", skip_all, fields(email = %credentials.email))]
pub async fn heartrate(
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let provider = gateway_for(&gateway, &credentials);

    let hr_raw = match provider.heart_rates(date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let rhr_raw = match provider.resting_heart_rate(date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };

    let record = resolve::heart_rate::record(&credentials.email, date, &hr_raw, &rhr_raw);
    let store = PgRecordStore::new(pool.get_ref().clone());
    if let Err(e) = store.upsert_heart_rate(&record).await {
        tracing::error!("failed to store heart rate data: {e}");
    }

    HttpResponse::Ok().json(json!({
        "date": date,
        "heart_rate": hr_raw,
        "resting_heart_rate": rhr_raw,
        "resting_hr": record.resting_hr,
        "average_hr": record.average_hr,
        "max_hr": record.max_hr,
        "min_hr": record.min_hr,
    }))
}

#[tracing::instrument(name = "Fetch sleep", skip_all, fields(email = %credentials.email))]
pub async fn sleep(
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let provider = gateway_for(&gateway, &credentials);

    let sleep_raw = match provider.sleep(date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };

    let record = resolve::sleep::record(&credentials.email, date, &sleep_raw);
    if let Some(record) = &record {
        let store = PgRecordStore::new(pool.get_ref().clone());
        if let Err(e) = store.upsert_sleep(record).await {
            tracing::error!("failed to store sleep data: {e}");
        }
    }

    let stages = record.as_ref().map(|r| {
        json!({
            "deep_seconds": r.deep_sleep_seconds,
            "light_seconds": r.light_sleep_seconds,
            "rem_seconds": r.rem_sleep_seconds,
            "awake_seconds": r.awake_seconds,
        })
    });

    HttpResponse::Ok().json(json!({
        "date": date,
        "sleep_data": sleep_raw,
        "sleep_score": record.as_ref().and_then(|r| r.sleep_score),
        "sleep_duration_seconds": record.as_ref().and_then(|r| r.sleep_duration_seconds),
        "sleep_duration_minutes": record.as_ref().and_then(|r| r.sleep_duration_minutes),
        "sleep_stages": stages,
        "average_spo2": record.as_ref().and_then(|r| r.average_spo2),
        "lowest_spo2": record.as_ref().and_then(|r| r.lowest_spo2),
        "average_respiration": record.as_ref().and_then(|r| r.average_respiration),
        "lowest_respiration": record.as_ref().and_then(|r| r.lowest_respiration),
    }))
}

#[tracing::instrument(name = "Fetch stress", skip_all, fields(email = %credentials.email))]
pub async fn stress(
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let provider = gateway_for(&gateway, &credentials);

    let stress_raw = match provider.all_day_stress(date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };

    let daily = resolve::shape::daily_object(&stress_raw);
    let (histogram, samples) = resolve::stress::summarize(daily);
    let record = resolve::stress::record(&credentials.email, date, daily);
    let store = PgRecordStore::new(pool.get_ref().clone());
    if let Err(e) = store.upsert_stress(&record).await {
        tracing::error!("failed to store stress data: {e}");
    }

    HttpResponse::Ok().json(json!({
        "date": date,
        "stress_data": daily,
        "stress_distribution": {
            "rest_minutes": histogram.rest_minutes,
            "low_stress_minutes": histogram.low_minutes,
            "medium_stress_minutes": histogram.medium_minutes,
            "high_stress_minutes": histogram.high_minutes,
        },
        "stress_statistics": {
            "average_stress": histogram.average_stress,
            "max_stress": histogram.max_stress,
            "total_stress_minutes": histogram.total_stress_minutes,
        },
        "hourly_stress": samples,
    }))
}

#[tracing::instrument(name = "Fetch body battery", skip_all, fields(email = %credentials.email))]
pub async fn bodybattery(
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let provider = gateway_for(&gateway, &credentials);

    let bb_raw = match provider.body_battery(date, date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };

    let record = resolve::body_battery::record(&credentials.email, date, &bb_raw);
    let store = PgRecordStore::new(pool.get_ref().clone());
    if let Err(e) = store.upsert_body_battery(&record).await {
        tracing::error!("failed to store body battery data: {e}");
    }

    HttpResponse::Ok().json(json!({
        "date": date,
        "charged": record.charged,
        "drained": record.drained,
        "body_battery_data": bb_raw,
    }))
}

#[tracing::instrument(name = "Fetch activities", skip_all, fields(email = %credentials.email))]
pub async fn activities(
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let provider = gateway_for(&gateway, &credentials);

    let raw = match provider.activities(date, date).await {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };

    let store = PgRecordStore::new(pool.get_ref().clone());
    let mut detailed = Vec::new();
    for activity in resolve::activity::list(&raw) {
        let detail = match activity.get("activityId") {
            Some(id) => {
                let id = id.to_string().trim_matches('"').to_owned();
                match provider.activity_detail(&id).await {
                    Ok(detail) => detail,
                    Err(e) => {
                        tracing::warn!("could not fetch detail for activity {id}: {e}");
                        serde_json::Value::Null
                    }
                }
            }
            None => serde_json::Value::Null,
        };

        let Some(record) = resolve::activity::record(&credentials.email, date, &activity, &detail)
        else {
            continue;
        };
        if let Err(e) = store.upsert_activity(&record).await {
            tracing::error!("failed to store activity {}: {e}", record.activity_id);
        }
        detailed.push(serde_json::to_value(&record).unwrap_or(activity));
    }

    HttpResponse::Ok().json(json!({
        "date": date,
        "activity_count": detailed.len(),
        "activities": detailed,
    }))
}

#[tracing::instrument(name = "Fetch health metrics", skip_all, fields(email = %credentials.email))]
pub async fn healthmetrics(
    credentials: GarminCredentials,
    pool: web::Data<PgPool>,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let provider = gateway_for(&gateway, &credentials);

    let payloads = match fetch_health_payloads(&provider, date).await {
        Ok(payloads) => payloads,
        Err(e) => return provider_error_response(&e),
    };

    let record = resolve::health_metrics::record(&credentials.email, date, &payloads);
    let store = PgRecordStore::new(pool.get_ref().clone());
    if let Err(e) = store.upsert_health_metrics(&record).await {
        tracing::error!("failed to store health metrics: {e}");
    }

    HttpResponse::Ok().json(json!({
        "date": date,
        "vo2_max": record.vo2_max,
        "fitness_age": record.fitness_age,
        "hrv": {
            "value": record.hrv_value,
            "full_data": payloads.hrv,
        },
        "training": {
            "readiness": record.training_readiness,
            "status": record.training_status,
            "readiness_data": payloads.training_readiness,
            "status_data": payloads.training_status,
        },
        "intensity_minutes": {
            "cardio": record.intensity_minutes_cardio,
            "anaerobic": record.intensity_minutes_anaerobic,
            "full_data": payloads.intensity_minutes,
        },
        "hydration": {
            "ml": record.hydration_ml,
            "goal_ml": record.hydration_goal_ml,
            "full_data": payloads.hydration,
        },
        "floors": {
            "climbed": record.floors_climbed,
            "full_data": payloads.floors,
        },
        "spo2": {
            "average": record.average_spo2,
            "lowest": record.lowest_spo2,
            "full_data": payloads.spo2,
        },
        "respiration": {
            "average": record.average_respiration,
            "lowest": record.lowest_respiration,
            "full_data": payloads.respiration,
        },
        "max_metrics": payloads.max_metrics,
    }))
}

/// Everything at once, read-only. Unlike the per-family endpoints this one
/// has no persistence side effect.
#[tracing::instrument(name = "Fetch all data", skip_all, fields(email = %credentials.email))]
pub async fn all_data(
    credentials: GarminCredentials,
    gateway: web::Data<GatewaySettings>,
) -> HttpResponse {
    let date = dates::yesterday();
    let email = credentials.email.clone();
    let provider = gateway_for(&gateway, &credentials);

    let (steps_raw, user_summary, hr_raw, sleep_raw, stress_raw, bb_raw, activities_raw, health) = tokio::join!(
        provider.steps(date),
        provider.user_summary(date),
        provider.heart_rates(date),
        provider.sleep(date),
        provider.all_day_stress(date),
        provider.body_battery(date, date),
        provider.activities(date, date),
        fetch_health_payloads(&provider, date),
    );

    let steps_raw = match steps_raw {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let user_summary = match user_summary {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let hr_raw = match hr_raw {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let sleep_raw = match sleep_raw {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let stress_raw = match stress_raw {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let bb_raw = match bb_raw {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let activities_raw = match activities_raw {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };
    let health = match health {
        Ok(value) => value,
        Err(e) => return provider_error_response(&e),
    };

    let hr_record = resolve::heart_rate::record(&email, date, &hr_raw, &serde_json::Value::Null);
    let sleep_record = resolve::sleep::record(&email, date, &sleep_raw);
    let stress_daily = resolve::shape::daily_object(&stress_raw);
    let (stress_hist, stress_samples) = resolve::stress::summarize(stress_daily);
    let bb_record = resolve::body_battery::record(&email, date, &bb_raw);
    let activity_list = resolve::activity::list(&activities_raw);
    let health_record = resolve::health_metrics::record(&email, date, &health);

    HttpResponse::Ok().json(json!({
        "date": date,
        "steps": {
            "total_steps": resolve::steps::total_steps(&user_summary),
            "hourly_data": resolve::steps::hourly_series(&steps_raw),
            "user_summary": user_summary,
        },
        "heart_rate": {
            "resting_hr": hr_record.resting_hr,
            "average_hr": hr_record.average_hr,
            "max_hr": hr_record.max_hr,
            "min_hr": hr_record.min_hr,
            "full_data": hr_raw,
        },
        "sleep": {
            "sleep_score": sleep_record.as_ref().and_then(|r| r.sleep_score),
            "duration_minutes": sleep_record.as_ref().and_then(|r| r.sleep_duration_minutes),
            "stages": sleep_record.as_ref().map(|r| json!({
                "deep": r.deep_sleep_seconds,
                "light": r.light_sleep_seconds,
                "rem": r.rem_sleep_seconds,
                "awake": r.awake_seconds,
            })),
            "full_data": sleep_raw,
        },
        "stress": {
            "distribution": {
                "rest_minutes": stress_hist.rest_minutes,
                "low_stress_minutes": stress_hist.low_minutes,
                "medium_stress_minutes": stress_hist.medium_minutes,
                "high_stress_minutes": stress_hist.high_minutes,
            },
            "average_stress": stress_hist.average_stress,
            "max_stress": stress_hist.max_stress,
            "hourly_stress": stress_samples,
        },
        "body_battery": {
            "charged": bb_record.charged,
            "drained": bb_record.drained,
            "full_data": bb_raw,
        },
        "activities": {
            "count": activity_list.len(),
            "activities": activity_list,
        },
        "health_metrics": {
            "vo2_max": health_record.vo2_max,
            "fitness_age": health_record.fitness_age,
            "hrv": health_record.hrv_value,
            "training_readiness": health_record.training_readiness,
            "training_status": health_record.training_status,
            "hydration_ml": health_record.hydration_ml,
            "intensity_minutes_cardio": health_record.intensity_minutes_cardio,
            "intensity_minutes_anaerobic": health_record.intensity_minutes_anaerobic,
            "floors_climbed": health_record.floors_climbed,
        },
    }))
}
