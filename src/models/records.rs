use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One normalized record per metric family, keyed by (email, date) — except
/// activities, which key by (email, activity_id).
///
/// `id`/`created_at`/`updated_at` are populated only when a record is read
/// back from storage; the resolvers leave them `None`. Metric fields are
/// individually optional: an absent resolution is stored as NULL on insert
/// and leaves the existing column untouched on update.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: String,
    pub date: NaiveDate,
    pub total_steps: Option<i64>,
    pub hourly_data: Value,
    pub full_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: String,
    pub date: NaiveDate,
    pub resting_hr: Option<i64>,
    pub average_hr: Option<i64>,
    pub max_hr: Option<i64>,
    pub min_hr: Option<i64>,
    pub full_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: String,
    pub date: NaiveDate,
    pub sleep_score: Option<i64>,
    pub sleep_duration_seconds: Option<i64>,
    pub sleep_duration_minutes: Option<i64>,
    pub deep_sleep_seconds: Option<i64>,
    pub light_sleep_seconds: Option<i64>,
    pub rem_sleep_seconds: Option<i64>,
    pub awake_seconds: Option<i64>,
    pub average_spo2: Option<f64>,
    pub lowest_spo2: Option<f64>,
    pub average_respiration: Option<f64>,
    pub lowest_respiration: Option<f64>,
    pub full_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: String,
    pub date: NaiveDate,
    pub rest_minutes: Option<i64>,
    pub low_stress_minutes: Option<i64>,
    pub medium_stress_minutes: Option<i64>,
    pub high_stress_minutes: Option<i64>,
    pub average_stress: Option<f64>,
    pub max_stress: Option<i64>,
    pub full_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyBatteryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: String,
    pub date: NaiveDate,
    pub charged: Option<i64>,
    pub drained: Option<i64>,
    pub full_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: String,
    pub activity_id: String,
    pub date: NaiveDate,
    pub activity_name: Option<String>,
    pub activity_type: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub duration_seconds: Option<i64>,
    pub distance_meters: Option<f64>,
    pub calories: Option<i64>,
    pub average_hr: Option<i64>,
    pub max_hr: Option<i64>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub elevation_gain: Option<f64>,
    pub average_cadence: Option<i64>,
    pub full_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetricsRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: String,
    pub date: NaiveDate,
    pub vo2_max: Option<f64>,
    pub fitness_age: Option<i64>,
    pub hrv_value: Option<f64>,
    pub training_readiness: Option<i64>,
    pub training_status: Option<String>,
    pub intensity_minutes_cardio: Option<i64>,
    pub intensity_minutes_anaerobic: Option<i64>,
    pub hydration_ml: Option<i64>,
    pub hydration_goal_ml: Option<i64>,
    pub floors_climbed: Option<i64>,
    pub average_spo2: Option<f64>,
    pub lowest_spo2: Option<f64>,
    pub average_respiration: Option<f64>,
    pub lowest_respiration: Option<f64>,
    pub full_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
