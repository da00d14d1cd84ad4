#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use fitbuddy_backend::db::store::{RecordStore, UpsertOutcome};
use fitbuddy_backend::errors::{ProviderError, StoreError};
use fitbuddy_backend::models::records::{
    ActivityRecord, BodyBatteryRecord, HealthMetricsRecord, HeartRateRecord, SleepRecord,
    StepsRecord, StressRecord,
};
use fitbuddy_backend::models::sync::MetricFamily;
use fitbuddy_backend::provider::FitnessProvider;

/// Scripted provider: each endpoint answers a fixed payload (`Null` by
/// default) or a fixed failure.
#[derive(Clone)]
pub enum MockResponse {
    Value(Value),
    Auth,
    Connectivity,
    RateLimited,
}

#[derive(Default)]
pub struct MockProvider {
    responses: HashMap<&'static str, MockResponse>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, endpoint: &'static str, value: Value) -> Self {
        self.responses.insert(endpoint, MockResponse::Value(value));
        self
    }

    pub fn failing(mut self, endpoint: &'static str, response: MockResponse) -> Self {
        self.responses.insert(endpoint, response);
        self
    }

    fn answer(&self, endpoint: &str) -> Result<Value, ProviderError> {
        match self.responses.get(endpoint) {
            None => Ok(Value::Null),
            Some(MockResponse::Value(value)) => Ok(value.clone()),
            Some(MockResponse::Auth) => Err(ProviderError::Auth),
            Some(MockResponse::Connectivity) => {
                Err(ProviderError::Connectivity("connection refused".into()))
            }
            Some(MockResponse::RateLimited) => Err(ProviderError::RateLimited),
        }
    }
}

#[async_trait]
impl FitnessProvider for MockProvider {
    async fn user_summary(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("user_summary")
    }
    async fn steps(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("steps")
    }
    async fn heart_rates(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("heart_rates")
    }
    async fn resting_heart_rate(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("resting_heart_rate")
    }
    async fn sleep(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("sleep")
    }
    async fn all_day_stress(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("all_day_stress")
    }
    async fn body_battery(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Value, ProviderError> {
        self.answer("body_battery")
    }
    async fn activities(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("activities")
    }
    async fn activity_detail(&self, _activity_id: &str) -> Result<Value, ProviderError> {
        self.answer("activity_detail")
    }
    async fn max_metrics(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("max_metrics")
    }
    async fn hrv(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("hrv")
    }
    async fn training_readiness(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("training_readiness")
    }
    async fn training_status(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("training_status")
    }
    async fn hydration(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("hydration")
    }
    async fn intensity_minutes(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("intensity_minutes")
    }
    async fn floors(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("floors")
    }
    async fn spo2(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("spo2")
    }
    async fn respiration(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("respiration")
    }
    async fn fitness_age(&self, _date: NaiveDate) -> Result<Value, ProviderError> {
        self.answer("fitness_age")
    }
}

/// In-memory record store with the same merge semantics as the Postgres
/// implementation: insert-or-update on the natural key, absent (null)
/// fields never overwrite stored values, `full_data` always replaced.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, BTreeMap<String, Value>>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upsert against `family` fail, for storage-error tests.
    pub fn fail_writes_for(&self, family: MetricFamily) {
        self.failing.lock().unwrap().insert(family.table_name());
    }

    pub fn row_count(&self, family: MetricFamily) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(family.table_name())
            .map_or(0, BTreeMap::len)
    }

    pub fn row(&self, family: MetricFamily, key: &str) -> Option<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(family.table_name())
            .and_then(|rows| rows.get(key))
            .cloned()
    }

    fn upsert(
        &self,
        family: MetricFamily,
        key: String,
        record: Value,
    ) -> Result<UpsertOutcome, StoreError> {
        let table = family.table_name();
        if self.failing.lock().unwrap().contains(table) {
            return Err(StoreError::Database(sqlx::Error::Protocol(
                "injected storage failure".into(),
            )));
        }

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table).or_default();
        match rows.get_mut(&key) {
            Some(existing) => {
                let (Value::Object(existing_map), Value::Object(incoming)) = (existing, record)
                else {
                    unreachable!("records always serialize to objects");
                };
                for (field, value) in incoming {
                    if field == "full_data" || !value.is_null() {
                        existing_map.insert(field, value);
                    }
                }
                Ok(UpsertOutcome::Updated)
            }
            None => {
                rows.insert(key, record);
                Ok(UpsertOutcome::Created)
            }
        }
    }
}

fn daily_key(email: &str, date: NaiveDate) -> String {
    format!("{email}|{date}")
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert_steps(&self, record: &StepsRecord) -> Result<UpsertOutcome, StoreError> {
        self.upsert(
            MetricFamily::Steps,
            daily_key(&record.email, record.date),
            serde_json::to_value(record).unwrap(),
        )
    }

    async fn upsert_heart_rate(
        &self,
        record: &HeartRateRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        self.upsert(
            MetricFamily::HeartRate,
            daily_key(&record.email, record.date),
            serde_json::to_value(record).unwrap(),
        )
    }

    async fn upsert_sleep(&self, record: &SleepRecord) -> Result<UpsertOutcome, StoreError> {
        self.upsert(
            MetricFamily::Sleep,
            daily_key(&record.email, record.date),
            serde_json::to_value(record).unwrap(),
        )
    }

    async fn upsert_stress(&self, record: &StressRecord) -> Result<UpsertOutcome, StoreError> {
        self.upsert(
            MetricFamily::Stress,
            daily_key(&record.email, record.date),
            serde_json::to_value(record).unwrap(),
        )
    }

    async fn upsert_body_battery(
        &self,
        record: &BodyBatteryRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        self.upsert(
            MetricFamily::BodyBattery,
            daily_key(&record.email, record.date),
            serde_json::to_value(record).unwrap(),
        )
    }

    async fn upsert_activity(&self, record: &ActivityRecord) -> Result<UpsertOutcome, StoreError> {
        self.upsert(
            MetricFamily::Activities,
            format!("{}|{}", record.email, record.activity_id),
            serde_json::to_value(record).unwrap(),
        )
    }

    async fn upsert_health_metrics(
        &self,
        record: &HealthMetricsRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        self.upsert(
            MetricFamily::HealthMetrics,
            daily_key(&record.email, record.date),
            serde_json::to_value(record).unwrap(),
        )
    }

    async fn find_daily(
        &self,
        family: MetricFamily,
        email: &str,
        date: NaiveDate,
    ) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get(family.table_name()) else {
            return Ok(None);
        };
        let date_str = date.to_string();
        let matching: Vec<Value> = rows
            .values()
            .filter(|row| {
                row.get("email").and_then(Value::as_str) == Some(email)
                    && row.get("date").and_then(Value::as_str) == Some(date_str.as_str())
            })
            .cloned()
            .collect();

        if matching.is_empty() {
            return Ok(None);
        }
        if family == MetricFamily::Activities {
            Ok(Some(Value::Array(matching)))
        } else {
            Ok(Some(matching.into_iter().next().unwrap()))
        }
    }

    async fn find_range(
        &self,
        family: MetricFamily,
        email: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get(family.table_name()) else {
            return Ok(Vec::new());
        };
        let mut matching: Vec<Value> = rows
            .values()
            .filter(|row| {
                let Some(date) = row
                    .get("date")
                    .and_then(Value::as_str)
                    .and_then(|d| d.parse::<NaiveDate>().ok())
                else {
                    return false;
                };
                row.get("email").and_then(Value::as_str) == Some(email)
                    && date >= start
                    && date <= end
            })
            .cloned()
            .collect();
        matching.sort_by_key(|row| {
            row.get("date")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        });
        Ok(matching)
    }
}
