use serde_json::Value;

use super::accessor::FieldSpec;
use super::shape;

const VO2MAX_DIRECT: FieldSpec =
    FieldSpec::number(&[&["vo2MaxPreciseValue"], &["vo2MaxValue"]]);
const VO2MAX_FROM_STATUS: FieldSpec = FieldSpec::number(&[
    &["mostRecentVO2Max", "generic", "vo2MaxPreciseValue"],
    &["mostRecentVO2Max", "generic", "vo2MaxValue"],
]);

const FITNESS_AGE_DEDICATED: FieldSpec = FieldSpec::number(&[&["fitnessAge"]]);
const FITNESS_AGE_MAX_METRICS: FieldSpec = FieldSpec::number(&[&["fitnessAge"]]);

const HRV_WEEKLY_AVG: FieldSpec = FieldSpec::number(&[&["hrvSummary", "weeklyAvg"]]);

const READINESS_SCORE: FieldSpec = FieldSpec::number(&[
    &["score"],
    &["trainingReadinessScore"],
    &["trainingReadiness"],
]);

const TRAINING_STATUS: FieldSpec =
    FieldSpec::text(&[&["trainingStatus", "value"], &["trainingStatus"]]);

const HYDRATION_ML: FieldSpec = FieldSpec::number(&[&["valueInML"]]);
const HYDRATION_GOAL_ML: FieldSpec = FieldSpec::number(&[&["goalInML"]]);

const MODERATE_MINUTES: FieldSpec =
    FieldSpec::number(&[&["moderateMinutes"], &["moderateIntensityMinutes"]]);
const VIGOROUS_MINUTES: FieldSpec =
    FieldSpec::number(&[&["vigorousMinutes"], &["vigorousIntensityMinutes"]]);

const AVERAGE_SPO2: FieldSpec = FieldSpec::number(&[&["averageSpO2"]]);
const LOWEST_SPO2: FieldSpec = FieldSpec::number(&[&["lowestSpO2"]]);

const AVERAGE_RESPIRATION: FieldSpec =
    FieldSpec::number(&[&["avgWakingRespirationValue"], &["avgRespirationValue"]]);
const LOWEST_RESPIRATION: FieldSpec = FieldSpec::number(&[&["lowestRespirationValue"]]);

/// VO2 max prefers the dedicated max-metrics payload (precise value first),
/// then falls back to the training-status payload's most-recent snapshot.
pub fn vo2_max(max_metrics: &Value, training_status: &Value) -> Option<f64> {
    VO2MAX_DIRECT
        .resolve_f64(shape::daily_object(max_metrics))
        .or_else(|| VO2MAX_FROM_STATUS.resolve_f64(training_status))
}

/// `dedicated` is `None` when the fitness-age endpoint call itself failed;
/// only then does the max-metrics copy of the field apply. A successful
/// call without the field resolves to absent, not to the fallback.
pub fn fitness_age(dedicated: Option<&Value>, max_metrics: &Value) -> Option<i64> {
    match dedicated {
        Some(doc) => FITNESS_AGE_DEDICATED.resolve_i64(doc),
        None => FITNESS_AGE_MAX_METRICS.resolve_i64(shape::daily_object(max_metrics)),
    }
}

pub fn hrv_weekly_average(hrv_doc: &Value) -> Option<f64> {
    HRV_WEEKLY_AVG.resolve_f64(hrv_doc)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadinessResolution {
    pub score: Option<i64>,
    pub level: Option<String>,
}

/// Training readiness accepts both the object and list-of-objects shapes
/// and tries three score field names in fixed priority order. When the
/// readiness endpoint yields nothing, the per-device status table inside
/// the training-status payload stands in.
pub fn readiness(readiness_doc: &Value, status_doc: &Value) -> ReadinessResolution {
    let entry = shape::daily_object(readiness_doc);
    if let Some(score) = READINESS_SCORE.resolve_i64(entry) {
        return ReadinessResolution {
            score: Some(score),
            level: entry
                .get("level")
                .and_then(Value::as_str)
                .map(str::to_owned),
        };
    }
    device_status(status_doc)
}

/// Training status codes reported per device. 0-7 map to fixed labels; a
/// feedback phrase of the form `WORD_<n>` overrides the table when present.
pub fn status_label(code: i64) -> Option<&'static str> {
    Some(match code {
        0 => "No Status",
        1 => "Detraining",
        2 => "Recovery",
        3 => "Maintaining",
        4 => "Productive",
        5 => "Peaking",
        6 => "Overreaching",
        7 => "Unproductive",
        _ => return None,
    })
}

fn device_status(status_doc: &Value) -> ReadinessResolution {
    let Some(table) = status_doc
        .get("mostRecentTrainingStatus")
        .and_then(|v| v.get("latestTrainingStatusData"))
        .and_then(Value::as_object)
    else {
        return ReadinessResolution::default();
    };

    for status in table.values() {
        if !status.is_object() {
            continue;
        }
        let code = status.get("trainingStatus").and_then(Value::as_i64);
        let feedback = status
            .get("trainingStatusFeedbackPhrase")
            .and_then(Value::as_str)
            .unwrap_or("");
        let level = feedback
            .split('_')
            .next()
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .or_else(|| code.and_then(status_label).map(str::to_owned));
        return ReadinessResolution { score: code, level };
    }
    ReadinessResolution::default()
}

pub fn training_status(status_doc: &Value) -> Option<String> {
    TRAINING_STATUS.resolve_string(status_doc)
}

pub fn hydration(hydration_doc: &Value) -> (Option<i64>, Option<i64>) {
    (
        HYDRATION_ML.resolve_i64(hydration_doc),
        HYDRATION_GOAL_ML.resolve_i64(hydration_doc),
    )
}

pub fn intensity_minutes(intensity_doc: &Value) -> (i64, i64) {
    (
        MODERATE_MINUTES.resolve_i64(intensity_doc).unwrap_or(0),
        VIGOROUS_MINUTES.resolve_i64(intensity_doc).unwrap_or(0),
    )
}

pub fn spo2(spo2_doc: &Value) -> (Option<f64>, Option<f64>) {
    (
        AVERAGE_SPO2.resolve_f64(spo2_doc),
        LOWEST_SPO2.resolve_f64(spo2_doc),
    )
}

pub fn respiration(respiration_doc: &Value) -> (Option<f64>, Option<f64>) {
    (
        AVERAGE_RESPIRATION.resolve_f64(respiration_doc),
        LOWEST_RESPIRATION.resolve_f64(respiration_doc),
    )
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vo2_max_prefers_precise_then_rounded_then_status_payload() {
        let max = json!({"vo2MaxPreciseValue": 52.7, "vo2MaxValue": 53.0});
        assert_eq!(vo2_max(&max, &Value::Null), Some(52.7));

        let max = json!({"vo2MaxValue": 53.0});
        assert_eq!(vo2_max(&max, &Value::Null), Some(53.0));

        let status = json!({"mostRecentVO2Max": {"generic": {"vo2MaxPreciseValue": 51.2}}});
        assert_eq!(vo2_max(&Value::Null, &status), Some(51.2));
    }

    #[test]
    fn vo2_max_accepts_list_shaped_max_metrics() {
        let max = json!([{"vo2MaxPreciseValue": 49.9}]);
        assert_eq!(vo2_max(&max, &Value::Null), Some(49.9));
    }

    #[test]
    fn fitness_age_rounds_and_only_falls_back_on_endpoint_failure() {
        let dedicated = json!({"fitnessAge": 31.6});
        let max = json!({"fitnessAge": 35});
        assert_eq!(fitness_age(Some(&dedicated), &max), Some(32));
        // A reachable endpoint without the field does not use the fallback.
        assert_eq!(fitness_age(Some(&json!({})), &max), None);
        // A failed call does.
        assert_eq!(fitness_age(None, &max), Some(35));
    }

    #[test]
    fn hrv_requires_the_summary_object() {
        assert_eq!(
            hrv_weekly_average(&json!({"hrvSummary": {"weeklyAvg": 48.0}})),
            Some(48.0)
        );
        assert_eq!(hrv_weekly_average(&json!({"weeklyAvg": 48.0})), None);
    }

    #[test]
    fn readiness_takes_first_list_element_and_score_priority() {
        let doc = json!([{"trainingReadinessScore": 61, "level": "MODERATE"}, {"score": 99}]);
        let res = readiness(&doc, &Value::Null);
        assert_eq!(res.score, Some(61));
        assert_eq!(res.level.as_deref(), Some("MODERATE"));

        let doc = json!({"score": 77});
        assert_eq!(readiness(&doc, &Value::Null).score, Some(77));
    }

    #[test]
    fn readiness_falls_back_to_the_device_status_table() {
        let status = json!({
            "mostRecentTrainingStatus": {
                "latestTrainingStatusData": {
                    "3453xx99": {"trainingStatus": 4, "trainingStatusFeedbackPhrase": ""}
                }
            }
        });
        let res = readiness(&Value::Null, &status);
        assert_eq!(res.score, Some(4));
        assert_eq!(res.level.as_deref(), Some("Productive"));
    }

    #[test]
    fn feedback_phrase_overrides_the_status_table() {
        let status = json!({
            "mostRecentTrainingStatus": {
                "latestTrainingStatusData": {
                    "dev": {"trainingStatus": 2, "trainingStatusFeedbackPhrase": "PRODUCTIVE_3"}
                }
            }
        });
        let res = readiness(&Value::Null, &status);
        assert_eq!(res.score, Some(2));
        assert_eq!(res.level.as_deref(), Some("Productive"));
    }

    #[test]
    fn unknown_status_codes_have_no_label() {
        assert_eq!(status_label(7), Some("Unproductive"));
        assert_eq!(status_label(8), None);
    }

    #[test]
    fn training_status_handles_nested_and_flat_shapes() {
        assert_eq!(
            training_status(&json!({"trainingStatus": {"value": "MAINTAINING"}})).as_deref(),
            Some("MAINTAINING")
        );
        assert_eq!(
            training_status(&json!({"trainingStatus": "RECOVERY"})).as_deref(),
            Some("RECOVERY")
        );
        assert_eq!(training_status(&Value::Null), None);
    }

    #[test]
    fn intensity_minutes_default_to_zero() {
        assert_eq!(intensity_minutes(&Value::Null), (0, 0));
        assert_eq!(
            intensity_minutes(&json!({"moderateIntensityMinutes": 22, "vigorousMinutes": 9})),
            (22, 9)
        );
    }
}
