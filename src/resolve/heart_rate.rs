use chrono::NaiveDate;
use serde_json::{json, Value};

use super::accessor::FieldSpec;
use crate::models::records::HeartRateRecord;

const RESTING_HR: FieldSpec = FieldSpec::number(&[&["restingHeartRate"]]);
const AVERAGE_HR: FieldSpec = FieldSpec::number(&[&["averageHeartRate"]]);
const MAX_HR: FieldSpec = FieldSpec::number(&[&["maxHeartRate"]]);
const MIN_HR: FieldSpec = FieldSpec::number(&[&["minHeartRate"]]);

/// Mean of the positive samples in the `heartRateValues` series, truncated
/// to a whole bpm. Used only when the provider omits the direct average.
pub fn series_average(hr_raw: &Value) -> Option<i64> {
    let values = hr_raw.get("heartRateValues")?.as_array()?;
    let samples: Vec<f64> = values
        .iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            pair.get(1)?.as_f64().filter(|hr| *hr > 0.0)
        })
        .collect();
    if samples.is_empty() {
        return None;
    }
    Some((samples.iter().sum::<f64>() / samples.len() as f64) as i64)
}

pub fn average(hr_raw: &Value) -> Option<i64> {
    AVERAGE_HR
        .resolve_i64(hr_raw)
        .or_else(|| series_average(hr_raw))
}

pub fn record(email: &str, date: NaiveDate, hr_raw: &Value, rhr_raw: &Value) -> HeartRateRecord {
    HeartRateRecord {
        id: None,
        email: email.to_owned(),
        date,
        resting_hr: RESTING_HR.resolve_i64(hr_raw),
        average_hr: average(hr_raw),
        max_hr: MAX_HR.resolve_i64(hr_raw),
        min_hr: MIN_HR.resolve_i64(hr_raw),
        full_data: json!({
            "heart_rate": hr_raw,
            "resting_hr": rhr_raw,
        }),
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_average_is_preferred_over_the_series() {
        let doc = json!({
            "averageHeartRate": 62,
            "heartRateValues": [[0, 100], [1, 120]],
        });
        assert_eq!(average(&doc), Some(62));
    }

    #[test]
    fn average_is_derived_from_samples_when_direct_field_is_absent() {
        let doc = json!({
            "heartRateValues": [[0, 60], [1, 70], [2, 0], [3, null], [4, 81]],
        });
        // zero and null samples are dropped: (60 + 70 + 81) / 3 = 70.33 -> 70
        assert_eq!(average(&doc), Some(70));
    }

    #[test]
    fn empty_series_yields_no_average() {
        assert_eq!(average(&json!({"heartRateValues": []})), None);
        assert_eq!(average(&Value::Null), None);
    }

    #[test]
    fn record_extracts_all_four_statistics() {
        let doc = json!({
            "restingHeartRate": 48,
            "averageHeartRate": 64,
            "maxHeartRate": 152,
            "minHeartRate": 44,
        });
        let rec = record("a@b.c", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(), &doc, &Value::Null);
        assert_eq!(rec.resting_hr, Some(48));
        assert_eq!(rec.average_hr, Some(64));
        assert_eq!(rec.max_hr, Some(152));
        assert_eq!(rec.min_hr, Some(44));
    }
}
