use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::models::records::ActivityRecord;

/// Recover the activity list from whichever envelope the provider used:
/// a bare list, `{"activities": [..]}`, or the legacy
/// `{"ActivitiesForDay": {"payload": [..]}}` wrapper.
pub fn list(raw: &Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            if let Some(for_day) = map.get("ActivitiesForDay") {
                if let Some(payload) = for_day.get("payload").and_then(Value::as_array) {
                    return payload.clone();
                }
                if let Some(items) = for_day.as_array() {
                    return items.clone();
                }
            }
            map.get("activities")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Some API revisions wrap scalar metrics as `{"value": ..}`.
fn unwrapped<'a>(value: &'a Value) -> &'a Value {
    value.get("value").unwrap_or(value)
}

fn num_field(doc: &Value, key: &str) -> Option<f64> {
    doc.get(key).map(unwrapped).and_then(Value::as_f64)
}

fn int_field(doc: &Value, key: &str) -> Option<i64> {
    num_field(doc, key).map(|v| v.round() as i64)
}

fn text_field(doc: &Value, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn type_key(doc: &Value, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(|t| t.get("typeKey"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Local start times arrive in several close-but-different layouts
/// ("2026-01-15T07:30:00.0", with or without zone suffix). Strip the noise
/// and parse the common core.
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = raw
        .replace('Z', "")
        .replace("+00:00", "")
        .replace('T', " ");
    let core = cleaned.split('.').next().unwrap_or(&cleaned).trim().to_owned();
    NaiveDateTime::parse_from_str(&core, "%Y-%m-%d %H:%M:%S").ok()
}

/// Normalize one activity from its listing entry plus the (possibly absent)
/// detail payload; detail's `summaryDTO` carries the authoritative metrics.
/// Activities without an id cannot be keyed and are skipped.
pub fn record(
    email: &str,
    date: NaiveDate,
    activity: &Value,
    detail: &Value,
) -> Option<ActivityRecord> {
    let activity_id = activity.get("activityId").map(|id| match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })?;

    let summary = detail.get("summaryDTO").unwrap_or(&Value::Null);

    let start_time = [summary, activity, detail]
        .iter()
        .find_map(|doc| text_field(doc, "startTimeLocal"))
        .and_then(|raw| parse_start_time(&raw));

    let calories = int_field(summary, "calories")
        .or_else(|| int_field(activity, "calories"))
        .or_else(|| int_field(activity, "activeCalories"))
        .unwrap_or(0);

    Some(ActivityRecord {
        id: None,
        email: email.to_owned(),
        activity_id,
        date,
        activity_name: text_field(activity, "activityName")
            .or_else(|| text_field(detail, "activityName")),
        activity_type: type_key(detail, "activityTypeDTO").or_else(|| type_key(activity, "activityType")),
        start_time,
        duration_seconds: int_field(summary, "elapsedDuration")
            .or_else(|| int_field(activity, "elapsedDuration"))
            .or_else(|| int_field(activity, "duration")),
        distance_meters: num_field(summary, "distance").or_else(|| num_field(activity, "distance")),
        calories: Some(calories),
        average_hr: int_field(summary, "averageHR").or_else(|| int_field(activity, "averageHR")),
        max_hr: int_field(summary, "maxHR").or_else(|| int_field(activity, "maxHR")),
        average_speed: num_field(summary, "averageSpeed")
            .or_else(|| num_field(activity, "averageSpeed")),
        max_speed: num_field(summary, "maxSpeed").or_else(|| num_field(activity, "maxSpeed")),
        elevation_gain: num_field(summary, "elevationGain")
            .or_else(|| num_field(activity, "elevationGain")),
        average_cadence: int_field(summary, "averageRunCadence")
            .or_else(|| int_field(activity, "averageRunCadence")),
        full_data: if detail.is_object() {
            detail.clone()
        } else {
            activity.clone()
        },
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
    fn list_handles_all_three_envelopes() {
        let bare = json!([{"activityId": 1}]);
        let keyed = json!({"activities": [{"activityId": 1}]});
        let legacy = json!({"ActivitiesForDay": {"payload": [{"activityId": 1}]}});
        assert_eq!(list(&bare).len(), 1);
        assert_eq!(list(&keyed).len(), 1);
        assert_eq!(list(&legacy).len(), 1);
        assert!(list(&Value::Null).is_empty());
    }

    #[test]
    fn summary_dto_wins_over_listing_fields() {
        let activity = json!({"activityId": 42, "distance": 1000.0, "calories": 50});
        let detail = json!({"summaryDTO": {"distance": 5123.4, "calories": 311.8}});
        let rec = record("a@b.c", day(), &activity, &detail).unwrap();
        assert_eq!(rec.distance_meters, Some(5123.4));
        assert_eq!(rec.calories, Some(312));
    }

    #[test]
    fn value_wrapped_metrics_are_unwrapped() {
        let activity = json!({"activityId": 42, "averageHR": {"value": 148.0}});
        let rec = record("a@b.c", day(), &activity, &Value::Null).unwrap();
        assert_eq!(rec.average_hr, Some(148));
    }

    #[test]
    fn listing_entry_carries_the_record_when_detail_failed() {
        let activity = json!({
            "activityId": 42,
            "activityName": "Morning Run",
            "activityType": {"typeKey": "running"},
            "duration": 1800.0,
            "distance": 5000.0,
        });
        let rec = record("a@b.c", day(), &activity, &Value::Null).unwrap();
        assert_eq!(rec.activity_name.as_deref(), Some("Morning Run"));
        assert_eq!(rec.activity_type.as_deref(), Some("running"));
        assert_eq!(rec.duration_seconds, Some(1800));
        assert_eq!(rec.full_data, activity);
    }

    #[test]
    fn activities_without_an_id_are_skipped() {
        assert!(record("a@b.c", day(), &json!({"activityName": "x"}), &Value::Null).is_none());
    }

    #[test]
    fn start_time_parsing_tolerates_format_noise() {
        let parsed = parse_start_time("2026-01-15T07:30:05.123").unwrap();
        assert_eq!(parsed.to_string(), "2026-01-15 07:30:05");
        assert!(parse_start_time("2026-01-15 07:30:05").is_some());
        assert!(parse_start_time("garbage").is_none());
    }

    #[test]
    fn numeric_activity_ids_become_strings() {
        let rec = record("a@b.c", day(), &json!({"activityId": 987654}), &Value::Null).unwrap();
        assert_eq!(rec.activity_id, "987654");
    }
}
