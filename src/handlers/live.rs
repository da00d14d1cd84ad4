use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::{json, Value};

use super::provider_error_response;
use crate::config::settings::GatewaySettings;
use crate::errors::ProviderError;
use crate::provider::gateway::GarminGateway;
use crate::provider::FitnessProvider;
use crate::resolve;
use crate::sync::fetch_health_payloads;
use crate::utils::dates;

/// Live data for today, polled by the dashboard. Authenticates against the
/// gateway with the server-stored EMAIL/PASSWORD so the frontend never
/// handles wearable credentials. Every family is individually isolated: a
/// single dead endpoint shows up as that family's error object, not a
/// failed request.
#[tracing::instrument(name = "Fetch live data", skip_all)]
pub async fn live_data(gateway: web::Data<GatewaySettings>) -> HttpResponse {
    let (Ok(email), Ok(password)) = (std::env::var("EMAIL"), std::env::var("PASSWORD")) else {
        return HttpResponse::InternalServerError()
            .json(json!({"error": "Wearable credentials not configured on server"}));
    };

    let provider = GarminGateway::new(
        &gateway,
        email.clone(),
        SecretString::new(password.into_boxed_str()),
    );
    let date = dates::today();

    let (steps, heart_rate, sleep, stress, activities, health, running_goal) = tokio::join!(
        live_steps(&provider, date),
        live_heart_rate(&provider, date),
        live_sleep(&provider, date),
        live_stress(&provider, date),
        live_activities(&provider, date),
        live_health(&provider, &email, date),
        live_running_goal(&provider, date),
    );

    // Rejected credentials abort the whole request; anything else stays
    // contained to its family.
    if [&steps, &heart_rate, &sleep, &activities, &health, &running_goal]
        .iter()
        .any(|r| matches!(r, Err(ProviderError::Auth)))
        || matches!(stress, Err(ProviderError::Auth))
    {
        return provider_error_response(&ProviderError::Auth);
    }

    // The detailed body-battery timeline rides along in the stress payload.
    let (stress_block, bb_timeline) = match stress {
        Ok(pair) => pair,
        Err(e) => (json!({"error": e.to_string()}), Vec::new()),
    };
    let body_battery = match live_body_battery(&provider, date, bb_timeline).await {
        Ok(value) => value,
        Err(ProviderError::Auth) => return provider_error_response(&ProviderError::Auth),
        Err(e) => json!({"error": e.to_string()}),
    };

    HttpResponse::Ok().json(json!({
        "date": date,
        "email": email,
        "steps": isolate(steps),
        "heart_rate": isolate(heart_rate),
        "sleep": isolate(sleep),
        "stress": stress_block,
        "body_battery": body_battery,
        "activities": isolate(activities),
        "health_metrics": isolate(health),
        "running_goal": isolate(running_goal),
    }))
}

fn isolate(result: Result<Value, ProviderError>) -> Value {
    match result {
        Ok(value) => value,
        Err(e) => json!({"error": e.to_string()}),
    }
}

async fn live_steps(provider: &GarminGateway, date: NaiveDate) -> Result<Value, ProviderError> {
    let steps_raw = provider.steps(date).await?;
    let summary = provider.user_summary(date).await?;
    Ok(json!({
        "total_steps": resolve::steps::total_steps(&summary),
        "daily_step_goal": summary.get("dailyStepGoal").cloned().unwrap_or(json!(10000)),
        "total_distance": summary.get("totalDistanceMeters").cloned().unwrap_or(json!(0)),
        "total_calories": summary.get("totalKilocalories").cloned().unwrap_or(json!(0)),
        "floors_ascended": summary.get("floorsAscended").cloned().unwrap_or(json!(0)),
        "hourly_data": resolve::steps::hourly_series(&steps_raw),
    }))
}

async fn live_heart_rate(
    provider: &GarminGateway,
    date: NaiveDate,
) -> Result<Value, ProviderError> {
    let hr_raw = provider.heart_rates(date).await?;
    Ok(json!({
        "resting_hr": hr_raw.get("restingHeartRate"),
        "max_hr": hr_raw.get("maxHeartRate"),
        "min_hr": hr_raw.get("minHeartRate"),
        "average_hr": resolve::heart_rate::series_average(&hr_raw),
        "heart_rate_values": hr_raw.get("heartRateValues").cloned().unwrap_or(json!([])),
    }))
}

async fn live_sleep(provider: &GarminGateway, date: NaiveDate) -> Result<Value, ProviderError> {
    let sleep_raw = provider.sleep(date).await?;
    let daily = sleep_raw.get("dailySleepDTO").cloned().unwrap_or(Value::Null);
    let record = resolve::sleep::record("", date, &sleep_raw);
    Ok(json!({
        "sleep_score": record.as_ref().and_then(|r| r.sleep_score),
        "sleep_duration_seconds": record.as_ref().and_then(|r| r.sleep_duration_seconds),
        "deep_sleep_seconds": record.as_ref().and_then(|r| r.deep_sleep_seconds),
        "light_sleep_seconds": record.as_ref().and_then(|r| r.light_sleep_seconds),
        "rem_sleep_seconds": record.as_ref().and_then(|r| r.rem_sleep_seconds),
        "awake_seconds": record.as_ref().and_then(|r| r.awake_seconds),
        "sleep_start": daily.get("sleepStartTimestampLocal"),
        "sleep_end": daily.get("sleepEndTimestampLocal"),
        "awake_count": daily.get("awakeCount"),
        "avg_sleep_stress": daily.get("avgSleepStress"),
        "average_spo2": record.as_ref().and_then(|r| r.average_spo2),
        "lowest_spo2": record.as_ref().and_then(|r| r.lowest_spo2),
        "average_respiration": record.as_ref().and_then(|r| r.average_respiration),
        "lowest_respiration": record.as_ref().and_then(|r| r.lowest_respiration),
        "avg_overnight_hrv": sleep_raw.get("avgOvernightHrv"),
        "hrv_status": sleep_raw.get("hrvStatus"),
        "body_battery_change": sleep_raw.get("bodyBatteryChange"),
        "resting_heart_rate": sleep_raw.get("restingHeartRate"),
        "sleep_levels": sleep_raw.get("sleepLevels").cloned().unwrap_or(json!([])),
        "sleep_heart_rate": sleep_raw.get("sleepHeartRate").cloned().unwrap_or(json!([])),
        "sleep_body_battery": sleep_raw.get("sleepBodyBattery").cloned().unwrap_or(json!([])),
        "sleep_scores_detail": daily.get("sleepScores").cloned().unwrap_or(json!({})),
    }))
}

/// Answers the stress block plus the `[timestamp, value]` body-battery
/// timeline embedded in the same payload (the dedicated body-battery
/// endpoint only carries a handful of transition points).
async fn live_stress(
    provider: &GarminGateway,
    date: NaiveDate,
) -> Result<(Value, Vec<Value>), ProviderError> {
    let stress_raw = provider.all_day_stress(date).await?;
    let daily = resolve::shape::daily_object(&stress_raw);
    let (hist, _) = resolve::stress::summarize(daily);

    let timeline = daily
        .get("bodyBatteryValuesArray")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let tuple = entry.as_array()?;
                    if tuple.len() < 3 || !tuple[2].is_number() {
                        return None;
                    }
                    Some(json!([tuple[0], tuple[2]]))
                })
                .collect()
        })
        .unwrap_or_default();

    let block = json!({
        "average_stress": daily.get("avgStressLevel"),
        "max_stress": daily.get("maxStressLevel"),
        "rest_minutes": hist.rest_minutes,
        "low_stress_minutes": hist.low_minutes,
        "medium_stress_minutes": hist.medium_minutes,
        "high_stress_minutes": hist.high_minutes,
    });
    Ok((block, timeline))
}

async fn live_body_battery(
    provider: &GarminGateway,
    date: NaiveDate,
    timeline: Vec<Value>,
) -> Result<Value, ProviderError> {
    let bb_raw = provider.body_battery(date, date).await?;
    let daily = resolve::shape::daily_object(&bb_raw);
    let timeline = if timeline.is_empty() {
        daily
            .get("bodyBatteryValuesArray")
            .cloned()
            .unwrap_or(json!([]))
    } else {
        Value::Array(timeline)
    };
    Ok(json!({
        "charged": daily.get("charged"),
        "drained": daily.get("drained"),
        "timeline": timeline,
        "start_timestamp": daily.get("startTimestampLocal"),
        "end_timestamp": daily.get("endTimestampLocal"),
    }))
}

async fn live_activities(
    provider: &GarminGateway,
    date: NaiveDate,
) -> Result<Value, ProviderError> {
    let raw = provider.activities(date, date).await?;
    let list: Vec<Value> = resolve::activity::list(&raw)
        .iter()
        .filter(|a| a.is_object())
        .map(|act| {
            let start_local = act
                .get("startTimeLocal")
                .and_then(Value::as_str)
                .unwrap_or("");
            json!({
                "activity_id": act.get("activityId"),
                "activity_name": act.get("activityName"),
                "activity_type": act.get("activityType").and_then(|t| t.get("typeKey")),
                "date": if start_local.is_empty() {
                    date.to_string()
                } else {
                    start_local.chars().take(10).collect()
                },
                "start_time": start_local,
                "duration_seconds": act.get("duration").or_else(|| act.get("elapsedDuration")),
                "distance_meters": act.get("distance"),
                "calories": act.get("calories").cloned().unwrap_or(json!(0)),
                "average_hr": act.get("averageHR"),
                "max_hr": act.get("maxHR"),
            })
        })
        .collect();
    Ok(json!({"activity_count": list.len(), "activities": list}))
}

async fn live_health(
    provider: &GarminGateway,
    email: &str,
    date: NaiveDate,
) -> Result<Value, ProviderError> {
    let payloads = fetch_health_payloads(provider, date).await?;
    let record = resolve::health_metrics::record(email, date, &payloads);
    let readiness =
        resolve::training::readiness(&payloads.training_readiness, &payloads.training_status);
    let (cardio, anaerobic) = resolve::training::intensity_minutes(&payloads.intensity_minutes);
    Ok(json!({
        "vo2_max": record.vo2_max,
        "fitness_age": record.fitness_age,
        "hrv_value": record.hrv_value,
        "training_readiness": readiness.score,
        "training_readiness_level": readiness.level,
        "training_status": record.training_status,
        "floors_climbed": record.floors_climbed,
        "average_spo2": record.average_spo2,
        "lowest_spo2": record.lowest_spo2,
        "average_respiration": record.average_respiration,
        "lowest_respiration": record.lowest_respiration,
        "intensity_minutes_cardio": cardio + anaerobic,
        "weekly_intensity_total": payloads.intensity_minutes.get("weeklyTotal"),
    }))
}

async fn live_running_goal(
    provider: &GarminGateway,
    today: NaiveDate,
) -> Result<Value, ProviderError> {
    let month_start = dates::month_start(today);
    let raw = provider.activities(month_start, today).await?;
    let activities = resolve::activity::list(&raw);
    let goal = resolve::running_goal::project(&activities, today);
    Ok(serde_json::to_value(goal).unwrap_or(Value::Null))
}
