use chrono::NaiveDate;
use serde_json::Value;

use super::accessor::FieldSpec;
use crate::models::records::StressRecord;

/// Each entry in the stress series covers a fixed three-minute window.
pub const SAMPLE_INTERVAL_MINUTES: i64 = 3;

const AVG_STRESS: FieldSpec = FieldSpec::number(&[&["avgStressLevel"]]);
const MAX_STRESS: FieldSpec = FieldSpec::number(&[&["maxStressLevel"]]);

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct StressHistogram {
    pub rest_minutes: i64,
    pub low_minutes: i64,
    pub medium_minutes: i64,
    pub high_minutes: i64,
    pub average_stress: f64,
    pub max_stress: i64,
    pub total_stress_minutes: i64,
}

/// Bucket a `[timestamp_ms, level]` sample series into the four stress
/// bands: rest 0-25, low 26-50, medium 51-75, high 76+. Negative levels
/// mean the device was not measuring and fall into no bucket; a
/// non-numeric level counts as 0. Only levels above zero contribute to the
/// average and the monitored-minutes total.
pub fn histogram(samples: &[Value]) -> StressHistogram {
    let mut hist = StressHistogram::default();
    let mut weighted_sum = 0.0;

    for sample in samples {
        let Some(pair) = sample.as_array() else {
            continue;
        };
        if pair.len() < 2 {
            continue;
        }
        let level = pair[1].as_f64().unwrap_or(0.0);
        if level < 0.0 {
            continue;
        }

        if level <= 25.0 {
            hist.rest_minutes += SAMPLE_INTERVAL_MINUTES;
        } else if level <= 50.0 {
            hist.low_minutes += SAMPLE_INTERVAL_MINUTES;
        } else if level <= 75.0 {
            hist.medium_minutes += SAMPLE_INTERVAL_MINUTES;
        } else {
            hist.high_minutes += SAMPLE_INTERVAL_MINUTES;
        }

        if level > 0.0 {
            hist.total_stress_minutes += SAMPLE_INTERVAL_MINUTES;
            weighted_sum += level * SAMPLE_INTERVAL_MINUTES as f64;
            hist.max_stress = hist.max_stress.max(level.round() as i64);
        }
    }

    if hist.total_stress_minutes > 0 {
        hist.average_stress = round2(weighted_sum / hist.total_stress_minutes as f64);
    }
    hist
}

/// Histogram for a full daily stress document. The provider's own average
/// overrides the locally computed one; its maximum only ever raises ours.
pub fn summarize(stress_doc: &Value) -> (StressHistogram, Vec<Value>) {
    let samples = stress_doc
        .get("stressValuesArray")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut hist = histogram(&samples);
    if let Some(avg) = AVG_STRESS.resolve_f64(stress_doc) {
        hist.average_stress = round2(avg);
    }
    if let Some(max) = MAX_STRESS.resolve_i64(stress_doc) {
        if max > hist.max_stress {
            hist.max_stress = max;
        }
    }
    (hist, samples)
}

pub fn record(email: &str, date: NaiveDate, stress_doc: &Value) -> StressRecord {
    let (hist, _) = summarize(stress_doc);
    StressRecord {
        id: None,
        email: email.to_owned(),
        date,
        rest_minutes: Some(hist.rest_minutes),
        low_stress_minutes: Some(hist.low_minutes),
        medium_stress_minutes: Some(hist.medium_minutes),
        high_stress_minutes: Some(hist.high_minutes),
        average_stress: Some(hist.average_stress),
        max_stress: Some(hist.max_stress),
        full_data: stress_doc.clone(),
        created_at: None,
        updated_at: None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_sample_per_bucket() {
        let samples = [json!([0, 10]), json!([1, 40]), json!([2, 60]), json!([3, 90])];
        let hist = histogram(&samples);
        assert_eq!(hist.rest_minutes, 3);
        assert_eq!(hist.low_minutes, 3);
        assert_eq!(hist.medium_minutes, 3);
        assert_eq!(hist.high_minutes, 3);
        assert_eq!(hist.average_stress, 50.0);
        assert_eq!(hist.max_stress, 90);
        assert_eq!(hist.total_stress_minutes, 12);
    }

    #[test]
    fn bucket_boundaries_are_inclusive() {
        let samples = [json!([0, 25]), json!([1, 26]), json!([2, 50]), json!([3, 51]), json!([4, 75]), json!([5, 76])];
        let hist = histogram(&samples);
        assert_eq!(hist.rest_minutes, 3);
        assert_eq!(hist.low_minutes, 6);
        assert_eq!(hist.medium_minutes, 6);
        assert_eq!(hist.high_minutes, 3);
    }

    #[test]
    fn unmeasured_samples_are_skipped_and_zero_counts_as_rest() {
        let samples = [json!([0, -1]), json!([1, 0]), json!([2, "bad"]), json!([3]), json!(7)];
        let hist = histogram(&samples);
        // -1 is outside every bucket; 0 and the non-numeric sample land in
        // rest; short/malformed entries are dropped.
        assert_eq!(hist.rest_minutes, 6);
        assert_eq!(hist.total_stress_minutes, 0);
        assert_eq!(hist.average_stress, 0.0);
    }

    #[test]
    fn empty_series_yields_all_zero_histogram() {
        assert_eq!(histogram(&[]), StressHistogram::default());
    }

    #[test]
    fn upstream_average_overrides_computed_one() {
        let doc = json!({
            "avgStressLevel": 33.333,
            "stressValuesArray": [[0, 90], [1, 90]],
        });
        let (hist, _) = summarize(&doc);
        assert_eq!(hist.average_stress, 33.33);
    }

    #[test]
    fn upstream_max_raises_but_never_lowers() {
        let doc = json!({
            "maxStressLevel": 40,
            "stressValuesArray": [[0, 80]],
        });
        let (hist, _) = summarize(&doc);
        assert_eq!(hist.max_stress, 80);

        let doc = json!({
            "maxStressLevel": 95,
            "stressValuesArray": [[0, 80]],
        });
        let (hist, _) = summarize(&doc);
        assert_eq!(hist.max_stress, 95);
    }

    #[test]
    fn missing_series_is_not_an_error() {
        let (hist, samples) = summarize(&Value::Null);
        assert_eq!(hist, StressHistogram::default());
        assert!(samples.is_empty());
    }
}
