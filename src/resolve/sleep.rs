use chrono::NaiveDate;
use serde_json::Value;

use super::accessor::FieldSpec;
use crate::models::records::SleepRecord;

// Newer firmware nests the score under dailySleepDTO.sleepScores.overall;
// older payloads put it at the root or use the legacy quality-score name.
const SLEEP_SCORE: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "sleepScores", "overall", "value"],
    &["sleepScore"],
    &["dailySleepDTO", "sleepScore"],
    &["sleepQualityScore"],
    &["dailySleepDTO", "sleepQualityScore"],
]);

const SLEEP_SECONDS: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "sleepTimeSeconds"],
    &["sleepTimeSeconds"],
]);

const DEEP_SECONDS: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "deepSleepSeconds"],
    &["deepSleepSeconds"],
]);
const LIGHT_SECONDS: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "lightSleepSeconds"],
    &["lightSleepSeconds"],
]);
const REM_SECONDS: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "remSleepSeconds"],
    &["remSleepSeconds"],
]);
const AWAKE_SECONDS: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "awakeSleepSeconds"],
    &["awakeSleepSeconds"],
]);

const AVERAGE_SPO2: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "averageSpO2Value"],
    &["averageSpO2"],
]);
const LOWEST_SPO2: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "lowestSpO2Value"],
    &["lowestSpO2"],
]);
const AVERAGE_RESPIRATION: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "averageRespirationValue"],
    &["averageRespirationValue"],
]);
const LOWEST_RESPIRATION: FieldSpec = FieldSpec::number(&[
    &["dailySleepDTO", "lowestRespirationValue"],
    &["lowestRespirationValue"],
]);

pub fn score(sleep_raw: &Value) -> Option<i64> {
    SLEEP_SCORE.resolve_i64(sleep_raw)
}

/// Returns `None` when the provider sent no usable sleep document at all;
/// individual stage fields inside a usable document stay independently
/// optional.
pub fn record(email: &str, date: NaiveDate, sleep_raw: &Value) -> Option<SleepRecord> {
    if !sleep_raw.is_object() {
        return None;
    }

    let duration_seconds = SLEEP_SECONDS.resolve_i64(sleep_raw);
    Some(SleepRecord {
        id: None,
        email: email.to_owned(),
        date,
        sleep_score: score(sleep_raw),
        sleep_duration_seconds: duration_seconds,
        sleep_duration_minutes: duration_seconds.map(|s| s / 60),
        deep_sleep_seconds: DEEP_SECONDS.resolve_i64(sleep_raw),
        light_sleep_seconds: LIGHT_SECONDS.resolve_i64(sleep_raw),
        rem_sleep_seconds: REM_SECONDS.resolve_i64(sleep_raw),
        awake_seconds: AWAKE_SECONDS.resolve_i64(sleep_raw),
        average_spo2: AVERAGE_SPO2.resolve_f64(sleep_raw),
        lowest_spo2: LOWEST_SPO2.resolve_f64(sleep_raw),
        average_respiration: AVERAGE_RESPIRATION.resolve_f64(sleep_raw),
        lowest_respiration: LOWEST_RESPIRATION.resolve_f64(sleep_raw),
        full_data: sleep_raw.clone(),
        created_at: None,
        updated_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn nested_overall_score_wins_over_legacy_locations() {
        let doc = json!({
            "sleepScore": 70,
            "dailySleepDTO": {"sleepScores": {"overall": {"value": 84}}},
        });
        assert_eq!(score(&doc), Some(84));
    }

    #[test]
    fn legacy_quality_score_is_the_last_resort() {
        assert_eq!(score(&json!({"sleepQualityScore": 66})), Some(66));
    }

    #[test]
    fn duration_minutes_use_integer_division() {
        let doc = json!({"dailySleepDTO": {"sleepTimeSeconds": 27541}});
        let rec = record("a@b.c", day(), &doc).unwrap();
        assert_eq!(rec.sleep_duration_seconds, Some(27541));
        assert_eq!(rec.sleep_duration_minutes, Some(459));
    }

    #[test]
    fn stage_fields_are_independently_optional() {
        let doc = json!({
            "dailySleepDTO": {
                "deepSleepSeconds": 5400,
                "remSleepSeconds": 4100,
            }
        });
        let rec = record("a@b.c", day(), &doc).unwrap();
        assert_eq!(rec.deep_sleep_seconds, Some(5400));
        assert_eq!(rec.light_sleep_seconds, None);
        assert_eq!(rec.rem_sleep_seconds, Some(4100));
        assert_eq!(rec.awake_seconds, None);
    }

    #[test]
    fn missing_document_means_no_record() {
        assert!(record("a@b.c", day(), &Value::Null).is_none());
        assert!(record("a@b.c", day(), &json!([])).is_none());
    }
}
