use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::{PgPool, Row};

use super::store::{RecordStore, UpsertOutcome};
use crate::errors::StoreError;
use crate::models::records::{
    ActivityRecord, BodyBatteryRecord, HealthMetricsRecord, HeartRateRecord, SleepRecord,
    StepsRecord, StressRecord,
};
use crate::models::sync::MetricFamily;

/// Postgres-backed record store.
///
/// All upserts are single `INSERT .. ON CONFLICT .. DO UPDATE` statements:
/// the natural-key unique constraint serializes concurrent writers for the
/// same key, and `COALESCE(EXCLUDED.col, tbl.col)` keeps stored values
/// wherever the incoming record resolved to NULL. `xmax = 0` on the
/// returned row distinguishes a fresh insert from an update.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn outcome(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<UpsertOutcome, StoreError> {
        let row = query.fetch_one(&self.pool).await?;
        let created: bool = row.try_get("created")?;
        Ok(if created {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn upsert_steps(&self, record: &StepsRecord) -> Result<UpsertOutcome, StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO steps_data (email, date, total_steps, hourly_data, full_data)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email, date) DO UPDATE SET
                total_steps = COALESCE(EXCLUDED.total_steps, steps_data.total_steps),
                hourly_data = EXCLUDED.hourly_data,
                full_data = EXCLUDED.full_data,
                updated_at = NOW()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(&record.email)
        .bind(record.date)
        .bind(record.total_steps)
        .bind(&record.hourly_data)
        .bind(&record.full_data);
        self.outcome(query).await
    }

    async fn upsert_heart_rate(
        &self,
        record: &HeartRateRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO heart_rate_data (email, date, resting_hr, average_hr, max_hr, min_hr, full_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email, date) DO UPDATE SET
                resting_hr = COALESCE(EXCLUDED.resting_hr, heart_rate_data.resting_hr),
                average_hr = COALESCE(EXCLUDED.average_hr, heart_rate_data.average_hr),
                max_hr = COALESCE(EXCLUDED.max_hr, heart_rate_data.max_hr),
                min_hr = COALESCE(EXCLUDED.min_hr, heart_rate_data.min_hr),
                full_data = EXCLUDED.full_data,
                updated_at = NOW()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(&record.email)
        .bind(record.date)
        .bind(record.resting_hr)
        .bind(record.average_hr)
        .bind(record.max_hr)
        .bind(record.min_hr)
        .bind(&record.full_data);
        self.outcome(query).await
    }

    async fn upsert_sleep(&self, record: &SleepRecord) -> Result<UpsertOutcome, StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO sleep_data (
                email, date, sleep_score, sleep_duration_seconds, sleep_duration_minutes,
                deep_sleep_seconds, light_sleep_seconds, rem_sleep_seconds, awake_seconds,
                average_spo2, lowest_spo2, average_respiration, lowest_respiration, full_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (email, date) DO UPDATE SET
                sleep_score = COALESCE(EXCLUDED.sleep_score, sleep_data.sleep_score),
                sleep_duration_seconds = COALESCE(EXCLUDED.sleep_duration_seconds, sleep_data.sleep_duration_seconds),
                sleep_duration_minutes = COALESCE(EXCLUDED.sleep_duration_minutes, sleep_data.sleep_duration_minutes),
                deep_sleep_seconds = COALESCE(EXCLUDED.deep_sleep_seconds, sleep_data.deep_sleep_seconds),
                light_sleep_seconds = COALESCE(EXCLUDED.light_sleep_seconds, sleep_data.light_sleep_seconds),
                rem_sleep_seconds = COALESCE(EXCLUDED.rem_sleep_seconds, sleep_data.rem_sleep_seconds),
                awake_seconds = COALESCE(EXCLUDED.awake_seconds, sleep_data.awake_seconds),
                average_spo2 = COALESCE(EXCLUDED.average_spo2, sleep_data.average_spo2),
                lowest_spo2 = COALESCE(EXCLUDED.lowest_spo2, sleep_data.lowest_spo2),
                average_respiration = COALESCE(EXCLUDED.average_respiration, sleep_data.average_respiration),
                lowest_respiration = COALESCE(EXCLUDED.lowest_respiration, sleep_data.lowest_respiration),
                full_data = EXCLUDED.full_data,
                updated_at = NOW()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(&record.email)
        .bind(record.date)
        .bind(record.sleep_score)
        .bind(record.sleep_duration_seconds)
        .bind(record.sleep_duration_minutes)
        .bind(record.deep_sleep_seconds)
        .bind(record.light_sleep_seconds)
        .bind(record.rem_sleep_seconds)
        .bind(record.awake_seconds)
        .bind(record.average_spo2)
        .bind(record.lowest_spo2)
        .bind(record.average_respiration)
        .bind(record.lowest_respiration)
        .bind(&record.full_data);
        self.outcome(query).await
    }

    async fn upsert_stress(&self, record: &StressRecord) -> Result<UpsertOutcome, StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO stress_data (
                email, date, rest_minutes, low_stress_minutes, medium_stress_minutes,
                high_stress_minutes, average_stress, max_stress, full_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (email, date) DO UPDATE SET
                rest_minutes = COALESCE(EXCLUDED.rest_minutes, stress_data.rest_minutes),
                low_stress_minutes = COALESCE(EXCLUDED.low_stress_minutes, stress_data.low_stress_minutes),
                medium_stress_minutes = COALESCE(EXCLUDED.medium_stress_minutes, stress_data.medium_stress_minutes),
                high_stress_minutes = COALESCE(EXCLUDED.high_stress_minutes, stress_data.high_stress_minutes),
                average_stress = COALESCE(EXCLUDED.average_stress, stress_data.average_stress),
                max_stress = COALESCE(EXCLUDED.max_stress, stress_data.max_stress),
                full_data = EXCLUDED.full_data,
                updated_at = NOW()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(&record.email)
        .bind(record.date)
        .bind(record.rest_minutes)
        .bind(record.low_stress_minutes)
        .bind(record.medium_stress_minutes)
        .bind(record.high_stress_minutes)
        .bind(record.average_stress)
        .bind(record.max_stress)
        .bind(&record.full_data);
        self.outcome(query).await
    }

    async fn upsert_body_battery(
        &self,
        record: &BodyBatteryRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO body_battery_data (email, date, charged, drained, full_data)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email, date) DO UPDATE SET
                charged = COALESCE(EXCLUDED.charged, body_battery_data.charged),
                drained = COALESCE(EXCLUDED.drained, body_battery_data.drained),
                full_data = EXCLUDED.full_data,
                updated_at = NOW()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(&record.email)
        .bind(record.date)
        .bind(record.charged)
        .bind(record.drained)
        .bind(&record.full_data);
        self.outcome(query).await
    }

    async fn upsert_activity(
        &self,
        record: &ActivityRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO activity_data (
                email, activity_id, date, activity_name, activity_type, start_time,
                duration_seconds, distance_meters, calories, average_hr, max_hr,
                average_speed, max_speed, elevation_gain, average_cadence, full_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (email, activity_id) DO UPDATE SET
                date = EXCLUDED.date,
                activity_name = COALESCE(EXCLUDED.activity_name, activity_data.activity_name),
                activity_type = COALESCE(EXCLUDED.activity_type, activity_data.activity_type),
                start_time = COALESCE(EXCLUDED.start_time, activity_data.start_time),
                duration_seconds = COALESCE(EXCLUDED.duration_seconds, activity_data.duration_seconds),
                distance_meters = COALESCE(EXCLUDED.distance_meters, activity_data.distance_meters),
                calories = COALESCE(EXCLUDED.calories, activity_data.calories),
                average_hr = COALESCE(EXCLUDED.average_hr, activity_data.average_hr),
                max_hr = COALESCE(EXCLUDED.max_hr, activity_data.max_hr),
                average_speed = COALESCE(EXCLUDED.average_speed, activity_data.average_speed),
                max_speed = COALESCE(EXCLUDED.max_speed, activity_data.max_speed),
                elevation_gain = COALESCE(EXCLUDED.elevation_gain, activity_data.elevation_gain),
                average_cadence = COALESCE(EXCLUDED.average_cadence, activity_data.average_cadence),
                full_data = EXCLUDED.full_data,
                updated_at = NOW()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(&record.email)
        .bind(&record.activity_id)
        .bind(record.date)
        .bind(&record.activity_name)
        .bind(&record.activity_type)
        .bind(record.start_time)
        .bind(record.duration_seconds)
        .bind(record.distance_meters)
        .bind(record.calories)
        .bind(record.average_hr)
        .bind(record.max_hr)
        .bind(record.average_speed)
        .bind(record.max_speed)
        .bind(record.elevation_gain)
        .bind(record.average_cadence)
        .bind(&record.full_data);
        self.outcome(query).await
    }

    async fn upsert_health_metrics(
        &self,
        record: &HealthMetricsRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO health_metrics_data (
                email, date, vo2_max, fitness_age, hrv_value, training_readiness,
                training_status, intensity_minutes_cardio, intensity_minutes_anaerobic,
                hydration_ml, hydration_goal_ml, floors_climbed, average_spo2, lowest_spo2,
                average_respiration, lowest_respiration, full_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (email, date) DO UPDATE SET
                vo2_max = COALESCE(EXCLUDED.vo2_max, health_metrics_data.vo2_max),
                fitness_age = COALESCE(EXCLUDED.fitness_age, health_metrics_data.fitness_age),
                hrv_value = COALESCE(EXCLUDED.hrv_value, health_metrics_data.hrv_value),
                training_readiness = COALESCE(EXCLUDED.training_readiness, health_metrics_data.training_readiness),
                training_status = COALESCE(EXCLUDED.training_status, health_metrics_data.training_status),
                intensity_minutes_cardio = COALESCE(EXCLUDED.intensity_minutes_cardio, health_metrics_data.intensity_minutes_cardio),
                intensity_minutes_anaerobic = COALESCE(EXCLUDED.intensity_minutes_anaerobic, health_metrics_data.intensity_minutes_anaerobic),
                hydration_ml = COALESCE(EXCLUDED.hydration_ml, health_metrics_data.hydration_ml),
                hydration_goal_ml = COALESCE(EXCLUDED.hydration_goal_ml, health_metrics_data.hydration_goal_ml),
                floors_climbed = COALESCE(EXCLUDED.floors_climbed, health_metrics_data.floors_climbed),
                average_spo2 = COALESCE(EXCLUDED.average_spo2, health_metrics_data.average_spo2),
                lowest_spo2 = COALESCE(EXCLUDED.lowest_spo2, health_metrics_data.lowest_spo2),
                average_respiration = COALESCE(EXCLUDED.average_respiration, health_metrics_data.average_respiration),
                lowest_respiration = COALESCE(EXCLUDED.lowest_respiration, health_metrics_data.lowest_respiration),
                full_data = EXCLUDED.full_data,
                updated_at = NOW()
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(&record.email)
        .bind(record.date)
        .bind(record.vo2_max)
        .bind(record.fitness_age)
        .bind(record.hrv_value)
        .bind(record.training_readiness)
        .bind(&record.training_status)
        .bind(record.intensity_minutes_cardio)
        .bind(record.intensity_minutes_anaerobic)
        .bind(record.hydration_ml)
        .bind(record.hydration_goal_ml)
        .bind(record.floors_climbed)
        .bind(record.average_spo2)
        .bind(record.lowest_spo2)
        .bind(record.average_respiration)
        .bind(record.lowest_respiration)
        .bind(&record.full_data);
        self.outcome(query).await
    }

    async fn find_daily(
        &self,
        family: MetricFamily,
        email: &str,
        date: NaiveDate,
    ) -> Result<Option<Value>, StoreError> {
        let table = family.table_name();
        if family == MetricFamily::Activities {
            let rows: Vec<Value> = sqlx::query_scalar(&format!(
                "SELECT to_jsonb(t) FROM {table} t WHERE email = $1 AND date = $2 ORDER BY start_time ASC NULLS LAST"
            ))
            .bind(email)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
            return Ok(if rows.is_empty() {
                None
            } else {
                Some(Value::Array(rows))
            });
        }

        let row: Option<Value> = sqlx::query_scalar(&format!(
            "SELECT to_jsonb(t) FROM {table} t WHERE email = $1 AND date = $2"
        ))
        .bind(email)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_range(
        &self,
        family: MetricFamily,
        email: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Value>, StoreError> {
        let table = family.table_name();
        let rows: Vec<Value> = sqlx::query_scalar(&format!(
            "SELECT to_jsonb(t) FROM {table} t
             WHERE email = $1 AND date >= $2 AND date <= $3
             ORDER BY date ASC"
        ))
        .bind(email)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
