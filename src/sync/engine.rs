use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::db::store::RecordStore;
use crate::errors::ProviderError;
use crate::models::sync::{FamilyStatus, MetricFamily, SyncReport};
use crate::provider::FitnessProvider;
use crate::resolve;
use crate::resolve::health_metrics::HealthPayloads;

/// Sequences one (user, day) sync: fan out the per-family fetches, resolve
/// each family that came back, and hand the normalized records to the
/// store. Failures stay contained to their family — only an authentication
/// rejection aborts the whole attempt.
pub struct SyncEngine<'a, P: FitnessProvider + ?Sized, S: RecordStore + ?Sized> {
    provider: &'a P,
    store: &'a S,
}

impl<'a, P: FitnessProvider + ?Sized, S: RecordStore + ?Sized> SyncEngine<'a, P, S> {
    pub fn new(provider: &'a P, store: &'a S) -> Self {
        Self { provider, store }
    }

    #[tracing::instrument(name = "Sync one day", skip(self), fields(email = %email, date = %date))]
    pub async fn sync_day(
        &self,
        email: &str,
        date: NaiveDate,
    ) -> Result<SyncReport, ProviderError> {
        let mut report = SyncReport::new(email, date);

        // The families are independent; fetch them concurrently.
        let (steps, heart_rate, sleep, stress, body_battery, activities, health) = tokio::join!(
            self.fetch_steps(date),
            self.fetch_heart_rate(date),
            self.provider.sleep(date),
            self.provider.all_day_stress(date),
            self.provider.body_battery(date, date),
            self.provider.activities(date, date),
            fetch_health_payloads(self.provider, date),
        );

        abort_on_auth(&steps)?;
        abort_on_auth(&heart_rate)?;
        abort_on_auth(&sleep)?;
        abort_on_auth(&stress)?;
        abort_on_auth(&body_battery)?;
        abort_on_auth(&activities)?;
        abort_on_auth(&health)?;

        self.apply_steps(&mut report, email, date, steps).await;
        self.apply_heart_rate(&mut report, email, date, heart_rate).await;
        self.apply_sleep(&mut report, email, date, sleep).await;
        self.apply_stress(&mut report, email, date, stress).await;
        self.apply_body_battery(&mut report, email, date, body_battery).await;
        self.apply_activities(&mut report, email, date, activities).await;
        self.apply_health_metrics(&mut report, email, date, health).await;

        Ok(report)
    }

    async fn fetch_steps(&self, date: NaiveDate) -> Result<(Value, Value), ProviderError> {
        let steps_raw = self.provider.steps(date).await?;
        let user_summary = self.provider.user_summary(date).await?;
        Ok((steps_raw, user_summary))
    }

    async fn fetch_heart_rate(&self, date: NaiveDate) -> Result<(Value, Value), ProviderError> {
        let hr_raw = self.provider.heart_rates(date).await?;
        let rhr_raw = self.provider.resting_heart_rate(date).await?;
        Ok((hr_raw, rhr_raw))
    }

    async fn apply_steps(
        &self,
        report: &mut SyncReport,
        email: &str,
        date: NaiveDate,
        fetched: Result<(Value, Value), ProviderError>,
    ) {
        let family = MetricFamily::Steps;
        match fetched {
            Ok((steps_raw, user_summary)) => {
                let record = resolve::steps::record(email, date, &steps_raw, &user_summary);
                report.add_summary("total_steps", json!(record.total_steps));
                self.persist(report, family, self.store.upsert_steps(&record).await);
            }
            Err(e) => report.set_status(family, FamilyStatus::Error(e.to_string())),
        }
    }

    async fn apply_heart_rate(
        &self,
        report: &mut SyncReport,
        email: &str,
        date: NaiveDate,
        fetched: Result<(Value, Value), ProviderError>,
    ) {
        let family = MetricFamily::HeartRate;
        match fetched {
            Ok((hr_raw, rhr_raw)) => {
                let record = resolve::heart_rate::record(email, date, &hr_raw, &rhr_raw);
                report.add_summary("resting_hr", json!(record.resting_hr));
                self.persist(report, family, self.store.upsert_heart_rate(&record).await);
            }
            Err(e) => report.set_status(family, FamilyStatus::Error(e.to_string())),
        }
    }

    async fn apply_sleep(
        &self,
        report: &mut SyncReport,
        email: &str,
        date: NaiveDate,
        fetched: Result<Value, ProviderError>,
    ) {
        let family = MetricFamily::Sleep;
        match fetched {
            Ok(sleep_raw) => match resolve::sleep::record(email, date, &sleep_raw) {
                Some(record) => {
                    report.add_summary("sleep_score", json!(record.sleep_score));
                    report.add_summary(
                        "sleep_duration_minutes",
                        json!(record.sleep_duration_minutes),
                    );
                    self.persist(report, family, self.store.upsert_sleep(&record).await);
                }
                None => report.set_status(family, FamilyStatus::NoData),
            },
            Err(e) => report.set_status(family, FamilyStatus::Error(e.to_string())),
        }
    }

    async fn apply_stress(
        &self,
        report: &mut SyncReport,
        email: &str,
        date: NaiveDate,
        fetched: Result<Value, ProviderError>,
    ) {
        let family = MetricFamily::Stress;
        match fetched {
            Ok(stress_raw) => {
                if stress_raw.is_null() {
                    report.set_status(family, FamilyStatus::NoData);
                    return;
                }
                let daily = resolve::shape::daily_object(&stress_raw);
                let record = resolve::stress::record(email, date, daily);
                report.add_summary("average_stress", json!(record.average_stress));
                self.persist(report, family, self.store.upsert_stress(&record).await);
            }
            Err(e) => report.set_status(family, FamilyStatus::Error(e.to_string())),
        }
    }

    async fn apply_body_battery(
        &self,
        report: &mut SyncReport,
        email: &str,
        date: NaiveDate,
        fetched: Result<Value, ProviderError>,
    ) {
        let family = MetricFamily::BodyBattery;
        match fetched {
            Ok(bb_raw) => {
                let record = resolve::body_battery::record(email, date, &bb_raw);
                report.add_summary("body_battery_charged", json!(record.charged));
                self.persist(report, family, self.store.upsert_body_battery(&record).await);
            }
            Err(e) => report.set_status(family, FamilyStatus::Error(e.to_string())),
        }
    }

    async fn apply_activities(
        &self,
        report: &mut SyncReport,
        email: &str,
        date: NaiveDate,
        fetched: Result<Value, ProviderError>,
    ) {
        let family = MetricFamily::Activities;
        let raw = match fetched {
            Ok(raw) => raw,
            Err(e) => {
                report.set_status(family, FamilyStatus::Error(e.to_string()));
                return;
            }
        };

        let mut activity_count = 0i64;
        let mut total_calories = 0i64;
        let mut first_error: Option<String> = None;

        for activity in resolve::activity::list(&raw) {
            let detail = match activity
                .get("activityId")
                .map(|id| id.to_string().trim_matches('"').to_owned())
            {
                Some(id) => match self.provider.activity_detail(&id).await {
                    Ok(detail) => detail,
                    Err(e) => {
                        tracing::warn!("could not fetch detail for activity {id}: {e}");
                        Value::Null
                    }
                },
                None => Value::Null,
            };

            let Some(record) = resolve::activity::record(email, date, &activity, &detail) else {
                continue;
            };
            total_calories += record.calories.unwrap_or(0);
            match self.store.upsert_activity(&record).await {
                Ok(_) => activity_count += 1,
                Err(e) => {
                    tracing::error!("failed to store activity {}: {e}", record.activity_id);
                    first_error.get_or_insert(e.to_string());
                }
            }
        }

        report.add_summary("activity_count", json!(activity_count));
        report.add_summary("total_calories", json!(total_calories));
        match first_error {
            Some(message) => report.set_status(family, FamilyStatus::Error(message)),
            None => report.set_status(family, FamilyStatus::Success),
        }
    }

    async fn apply_health_metrics(
        &self,
        report: &mut SyncReport,
        email: &str,
        date: NaiveDate,
        fetched: Result<HealthPayloads, ProviderError>,
    ) {
        let family = MetricFamily::HealthMetrics;
        match fetched {
            Ok(payloads) => {
                let record = resolve::health_metrics::record(email, date, &payloads);
                report.add_summary("vo2_max", json!(record.vo2_max));
                report.add_summary("training_readiness", json!(record.training_readiness));
                self.persist(report, family, self.store.upsert_health_metrics(&record).await);
            }
            Err(e) => report.set_status(family, FamilyStatus::Error(e.to_string())),
        }
    }

    fn persist<T>(
        &self,
        report: &mut SyncReport,
        family: MetricFamily,
        outcome: Result<T, crate::errors::StoreError>,
    ) {
        match outcome {
            Ok(_) => report.set_status(family, FamilyStatus::Success),
            Err(e) => {
                tracing::error!("failed to store {} record: {e}", family.report_key());
                report.set_status(family, FamilyStatus::Error(e.to_string()));
            }
        }
    }
}

/// Fetch the health-metrics payload bundle. Sub-metric fetch failures are
/// tolerated as `Null` so one dead endpoint never blocks the rest; only an
/// authentication rejection propagates. The dedicated fitness-age call
/// keeps its failed/empty distinction for the fallback rule.
pub async fn fetch_health_payloads<P: FitnessProvider + ?Sized>(
    provider: &P,
    date: NaiveDate,
) -> Result<HealthPayloads, ProviderError> {
    let (
        max_metrics,
        hrv,
        training_readiness,
        training_status,
        hydration,
        intensity_minutes,
        floors,
        spo2,
        respiration,
        fitness_age,
    ) = tokio::join!(
        provider.max_metrics(date),
        provider.hrv(date),
        provider.training_readiness(date),
        provider.training_status(date),
        provider.hydration(date),
        provider.intensity_minutes(date),
        provider.floors(date),
        provider.spo2(date),
        provider.respiration(date),
        provider.fitness_age(date),
    );

    Ok(HealthPayloads {
        max_metrics: tolerate("max_metrics", max_metrics)?,
        hrv: tolerate("hrv", hrv)?,
        training_readiness: tolerate("training_readiness", training_readiness)?,
        training_status: tolerate("training_status", training_status)?,
        hydration: tolerate("hydration", hydration)?,
        intensity_minutes: tolerate("intensity_minutes", intensity_minutes)?,
        floors: tolerate("floors", floors)?,
        spo2: tolerate("spo2", spo2)?,
        respiration: tolerate("respiration", respiration)?,
        fitness_age: match fitness_age {
            Ok(value) => Some(value),
            Err(ProviderError::Auth) => return Err(ProviderError::Auth),
            Err(e) => {
                tracing::warn!("failed to fetch fitness_age: {e}");
                None
            }
        },
    })
}

fn tolerate(name: &str, result: Result<Value, ProviderError>) -> Result<Value, ProviderError> {
    match result {
        Ok(value) => Ok(value),
        Err(ProviderError::Auth) => Err(ProviderError::Auth),
        Err(e) => {
            tracing::warn!("failed to fetch {name}: {e}");
            Ok(Value::Null)
        }
    }
}

fn abort_on_auth<T>(result: &Result<T, ProviderError>) -> Result<(), ProviderError> {
    match result {
        Err(ProviderError::Auth) => Err(ProviderError::Auth),
        _ => Ok(()),
    }
}
