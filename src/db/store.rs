use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StoreError;
use crate::models::records::{
    ActivityRecord, BodyBatteryRecord, HealthMetricsRecord, HeartRateRecord, SleepRecord,
    StepsRecord, StressRecord,
};
use crate::models::sync::MetricFamily;

/// Whether an upsert created a fresh row or folded into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Keyed storage for normalized records.
///
/// Every upsert is insert-or-update on the natural key — (email, date), or
/// (email, activity_id) for activities. Two concurrent writers for the same
/// key must serialize, with the loser degrading to an update. On update,
/// fields the resolver left absent keep their stored values; a transient
/// upstream gap never erases previously good data.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn upsert_steps(&self, record: &StepsRecord) -> Result<UpsertOutcome, StoreError>;
    async fn upsert_heart_rate(
        &self,
        record: &HeartRateRecord,
    ) -> Result<UpsertOutcome, StoreError>;
    async fn upsert_sleep(&self, record: &SleepRecord) -> Result<UpsertOutcome, StoreError>;
    async fn upsert_stress(&self, record: &StressRecord) -> Result<UpsertOutcome, StoreError>;
    async fn upsert_body_battery(
        &self,
        record: &BodyBatteryRecord,
    ) -> Result<UpsertOutcome, StoreError>;
    async fn upsert_activity(&self, record: &ActivityRecord)
        -> Result<UpsertOutcome, StoreError>;
    async fn upsert_health_metrics(
        &self,
        record: &HealthMetricsRecord,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Stored rows for one (email, day), serialized. Activities answer with
    /// a JSON array of every activity that day; other families with the
    /// single row.
    async fn find_daily(
        &self,
        family: MetricFamily,
        email: &str,
        date: NaiveDate,
    ) -> Result<Option<Value>, StoreError>;

    /// Stored rows for an inclusive date range, ordered by date ascending.
    async fn find_range(
        &self,
        family: MetricFamily,
        email: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Value>, StoreError>;
}
