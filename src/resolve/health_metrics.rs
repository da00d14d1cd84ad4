use chrono::NaiveDate;
use serde_json::{json, Value};

use super::{floors, training};
use crate::models::records::HealthMetricsRecord;

/// Raw payloads feeding the health-metrics family, one per upstream call.
/// A failed non-fatal call is represented as `Null` — except the dedicated
/// fitness-age endpoint, where call failure (`None`) and "no value"
/// (`Some(Null)`) trigger different fallback behavior.
#[derive(Debug, Clone, Default)]
pub struct HealthPayloads {
    pub max_metrics: Value,
    pub hrv: Value,
    pub training_readiness: Value,
    pub training_status: Value,
    pub hydration: Value,
    pub intensity_minutes: Value,
    pub floors: Value,
    pub spo2: Value,
    pub respiration: Value,
    pub fitness_age: Option<Value>,
}

/// Resolve every sub-metric independently: one absent upstream source never
/// blocks the others.
pub fn record(email: &str, date: NaiveDate, payloads: &HealthPayloads) -> HealthMetricsRecord {
    let readiness = training::readiness(&payloads.training_readiness, &payloads.training_status);
    let (hydration_ml, hydration_goal_ml) = training::hydration(&payloads.hydration);
    let (cardio_minutes, anaerobic_minutes) =
        training::intensity_minutes(&payloads.intensity_minutes);
    let (average_spo2, lowest_spo2) = training::spo2(&payloads.spo2);
    let (average_respiration, lowest_respiration) = training::respiration(&payloads.respiration);

    HealthMetricsRecord {
        id: None,
        email: email.to_owned(),
        date,
        vo2_max: training::vo2_max(&payloads.max_metrics, &payloads.training_status),
        fitness_age: training::fitness_age(payloads.fitness_age.as_ref(), &payloads.max_metrics),
        hrv_value: training::hrv_weekly_average(&payloads.hrv),
        training_readiness: readiness.score,
        training_status: training::training_status(&payloads.training_status),
        intensity_minutes_cardio: Some(cardio_minutes),
        intensity_minutes_anaerobic: Some(anaerobic_minutes),
        hydration_ml,
        hydration_goal_ml,
        floors_climbed: floors::total_ascended(&payloads.floors),
        average_spo2,
        lowest_spo2,
        average_respiration,
        lowest_respiration,
        full_data: json!({
            "max_metrics": payloads.max_metrics,
            "hrv_data": payloads.hrv,
            "training_readiness": payloads.training_readiness,
            "training_status": payloads.training_status,
            "hydration_data": payloads.hydration,
            "intensity_minutes": payloads.intensity_minutes,
            "floors_data": payloads.floors,
            "spo2_data": payloads.spo2,
            "respiration_data": payloads.respiration,
        }),
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn all_sources_present() {
        let payloads = HealthPayloads {
            max_metrics: json!({"vo2MaxPreciseValue": 52.1}),
            hrv: json!({"hrvSummary": {"weeklyAvg": 44}}),
            training_readiness: json!([{"score": 66}]),
            training_status: json!({"trainingStatus": {"value": "PRODUCTIVE"}}),
            hydration: json!({"valueInML": 1800, "goalInML": 2500}),
            intensity_minutes: json!({"moderateMinutes": 30, "vigorousMinutes": 12}),
            floors: json!({"floorValuesArray": [[0, 1, 9, 4]]}),
            spo2: json!({"averageSpO2": 95.0, "lowestSpO2": 89.0}),
            respiration: json!({"avgWakingRespirationValue": 14.2, "lowestRespirationValue": 11.0}),
            fitness_age: Some(json!({"fitnessAge": 29.4})),
        };
        let rec = record("a@b.c", day(), &payloads);
        assert_eq!(rec.vo2_max, Some(52.1));
        assert_eq!(rec.fitness_age, Some(29));
        assert_eq!(rec.hrv_value, Some(44.0));
        assert_eq!(rec.training_readiness, Some(66));
        assert_eq!(rec.training_status.as_deref(), Some("PRODUCTIVE"));
        assert_eq!(rec.intensity_minutes_cardio, Some(30));
        assert_eq!(rec.intensity_minutes_anaerobic, Some(12));
        assert_eq!(rec.hydration_ml, Some(1800));
        assert_eq!(rec.floors_climbed, Some(9));
        assert_eq!(rec.average_spo2, Some(95.0));
        assert_eq!(rec.lowest_respiration, Some(11.0));
    }

    #[test]
    fn one_absent_source_does_not_block_the_others() {
        let payloads = HealthPayloads {
            hrv: json!({"hrvSummary": {"weeklyAvg": 41}}),
            spo2: json!({"averageSpO2": 96.0}),
            ..Default::default()
        };
        let rec = record("a@b.c", day(), &payloads);
        assert_eq!(rec.vo2_max, None);
        assert_eq!(rec.hrv_value, Some(41.0));
        assert_eq!(rec.average_spo2, Some(96.0));
        assert_eq!(rec.training_readiness, None);
        // Intensity minutes default rather than stay absent.
        assert_eq!(rec.intensity_minutes_cardio, Some(0));
    }
}
