use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;

use super::FitnessProvider;
use crate::config::settings::GatewaySettings;
use crate::errors::ProviderError;

/// HTTP client for the wearable-data gateway.
///
/// The gateway fronts the vendor API with an authenticated session per
/// user; we forward the user's credentials on every request and translate
/// transport/status failures into the provider error taxonomy.
pub struct GarminGateway {
    http: reqwest::Client,
    base_url: String,
    email: String,
    password: SecretString,
}

impl GarminGateway {
    pub fn new(settings: &GatewaySettings, email: String, password: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .expect("failed to build the gateway HTTP client");
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            email,
            password,
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("X-Email", &self.email)
            .header("X-Password", self.password.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Connectivity(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Auth),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
            StatusCode::NO_CONTENT => Ok(Value::Null),
            status if !status.is_success() => Err(ProviderError::Upstream(format!(
                "{} answered {}",
                path, status
            ))),
            _ => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| ProviderError::Connectivity(e.to_string()))?;
                if body.is_empty() {
                    return Ok(Value::Null);
                }
                serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()))
            }
        }
    }

    async fn daily(&self, path: &str, date: NaiveDate) -> Result<Value, ProviderError> {
        self.get_json(path, &[("date", date.to_string())]).await
    }
}

#[async_trait]
impl FitnessProvider for GarminGateway {
    async fn user_summary(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/user-summary", date).await
    }

    async fn steps(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/steps", date).await
    }

    async fn heart_rates(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/heart-rate", date).await
    }

    async fn resting_heart_rate(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/resting-heart-rate", date).await
    }

    async fn sleep(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/sleep", date).await
    }

    async fn all_day_stress(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/stress", date).await
    }

    async fn body_battery(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Value, ProviderError> {
        self.get_json(
            "wellness/body-battery",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    async fn activities(&self, start: NaiveDate, end: NaiveDate) -> Result<Value, ProviderError> {
        self.get_json(
            "activities",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    async fn activity_detail(&self, activity_id: &str) -> Result<Value, ProviderError> {
        self.get_json(&format!("activities/{activity_id}"), &[]).await
    }

    async fn max_metrics(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("metrics/max-metrics", date).await
    }

    async fn hrv(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("metrics/hrv", date).await
    }

    async fn training_readiness(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("metrics/training-readiness", date).await
    }

    async fn training_status(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("metrics/training-status", date).await
    }

    async fn hydration(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/hydration", date).await
    }

    async fn intensity_minutes(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/intensity-minutes", date).await
    }

    async fn floors(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/floors", date).await
    }

    async fn spo2(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/spo2", date).await
    }

    async fn respiration(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("wellness/respiration", date).await
    }

    async fn fitness_age(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.daily("metrics/fitness-age", date).await
    }
}
