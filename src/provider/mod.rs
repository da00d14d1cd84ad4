//! Upstream wearable-data provider collaborators.
//!
//! The sync core only ever sees the [`FitnessProvider`] trait: a set of
//! per-payload fetches against an already-authenticated session. Login,
//! MFA and token caching are the gateway deployment's concern, not ours.

pub mod gateway;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::ProviderError;

/// One method per upstream payload. `Value::Null` means the provider had
/// no data for the day; shape surprises are left for the resolvers.
#[async_trait]
pub trait FitnessProvider: Send + Sync {
    async fn user_summary(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn steps(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn heart_rates(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn resting_heart_rate(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn sleep(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn all_day_stress(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn body_battery(&self, start: NaiveDate, end: NaiveDate)
        -> Result<Value, ProviderError>;
    async fn activities(&self, start: NaiveDate, end: NaiveDate) -> Result<Value, ProviderError>;
    async fn activity_detail(&self, activity_id: &str) -> Result<Value, ProviderError>;
    async fn max_metrics(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn hrv(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn training_readiness(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn training_status(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn hydration(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn intensity_minutes(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn floors(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn spo2(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn respiration(&self, date: NaiveDate) -> Result<Value, ProviderError>;
    async fn fitness_age(&self, date: NaiveDate) -> Result<Value, ProviderError>;
}
