use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The seven independently synced telemetry categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetricFamily {
    Steps,
    HeartRate,
    Sleep,
    Stress,
    BodyBattery,
    Activities,
    HealthMetrics,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 7] = [
        MetricFamily::Steps,
        MetricFamily::HeartRate,
        MetricFamily::Sleep,
        MetricFamily::Stress,
        MetricFamily::BodyBattery,
        MetricFamily::Activities,
        MetricFamily::HealthMetrics,
    ];

    /// Key used in sync reports.
    pub fn report_key(self) -> &'static str {
        match self {
            MetricFamily::Steps => "steps",
            MetricFamily::HeartRate => "heart_rate",
            MetricFamily::Sleep => "sleep",
            MetricFamily::Stress => "stress",
            MetricFamily::BodyBattery => "body_battery",
            MetricFamily::Activities => "activities",
            MetricFamily::HealthMetrics => "health_metrics",
        }
    }

    /// Key used in `/api/db/{data_type}` URLs.
    pub fn route_key(self) -> &'static str {
        match self {
            MetricFamily::Steps => "steps",
            MetricFamily::HeartRate => "heartrate",
            MetricFamily::Sleep => "sleep",
            MetricFamily::Stress => "stress",
            MetricFamily::BodyBattery => "bodybattery",
            MetricFamily::Activities => "activities",
            MetricFamily::HealthMetrics => "healthmetrics",
        }
    }

    pub fn from_route_key(raw: &str) -> Option<Self> {
        let raw = raw.to_lowercase();
        Self::ALL.into_iter().find(|f| f.route_key() == raw)
    }

    pub fn table_name(self) -> &'static str {
        match self {
            MetricFamily::Steps => "steps_data",
            MetricFamily::HeartRate => "heart_rate_data",
            MetricFamily::Sleep => "sleep_data",
            MetricFamily::Stress => "stress_data",
            MetricFamily::BodyBattery => "body_battery_data",
            MetricFamily::Activities => "activity_data",
            MetricFamily::HealthMetrics => "health_metrics_data",
        }
    }
}

/// Terminal status of one family within a sync attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyStatus {
    Success,
    NoData,
    Error(String),
}

impl Serialize for FamilyStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FamilyStatus::Success => serializer.serialize_str("success"),
            FamilyStatus::NoData => serializer.serialize_str("no_data"),
            FamilyStatus::Error(message) => {
                serializer.serialize_str(&format!("error: {message}"))
            }
        }
    }
}

/// Outcome of one full (user, day) sync: every attempted family with an
/// explicit status, plus headline numbers for quick inspection. Partial
/// success is always visible as such.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub date: NaiveDate,
    pub email: String,
    pub sync_status: BTreeMap<&'static str, FamilyStatus>,
    pub summary: Map<String, Value>,
}

impl SyncReport {
    pub fn new(email: &str, date: NaiveDate) -> Self {
        Self {
            date,
            email: email.to_owned(),
            sync_status: BTreeMap::new(),
            summary: Map::new(),
        }
    }

    pub fn set_status(&mut self, family: MetricFamily, status: FamilyStatus) {
        self.sync_status.insert(family.report_key(), status);
    }

    pub fn status(&self, family: MetricFamily) -> Option<&FamilyStatus> {
        self.sync_status.get(family.report_key())
    }

    pub fn add_summary(&mut self, key: &str, value: impl Into<Value>) {
        self.summary.insert(key.to_owned(), value.into());
    }

    pub fn is_full_success(&self) -> bool {
        MetricFamily::ALL
            .iter()
            .all(|f| !matches!(self.status(*f), Some(FamilyStatus::Error(_))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_keys_round_trip() {
        for family in MetricFamily::ALL {
            assert_eq!(MetricFamily::from_route_key(family.route_key()), Some(family));
        }
        assert_eq!(
            MetricFamily::from_route_key("HeartRate"),
            Some(MetricFamily::HeartRate)
        );
        assert_eq!(MetricFamily::from_route_key("unknown"), None);
    }

    #[test]
    fn statuses_serialize_like_the_report_contract() {
        assert_eq!(
            serde_json::to_value(FamilyStatus::Success).unwrap(),
            serde_json::json!("success")
        );
        assert_eq!(
            serde_json::to_value(FamilyStatus::Error("boom".into())).unwrap(),
            serde_json::json!("error: boom")
        );
    }
}
