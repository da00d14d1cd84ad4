use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::models::records::StepsRecord;

/// Daily step total lives in the user summary, not the steps series itself.
pub fn total_steps(user_summary: &Value) -> i64 {
    user_summary
        .get("totalSteps")
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

/// The hourly series is only usable when the provider actually sent a list.
pub fn hourly_series(steps_raw: &Value) -> Value {
    if steps_raw.is_array() {
        steps_raw.clone()
    } else {
        json!([])
    }
}

pub fn record(email: &str, date: NaiveDate, steps_raw: &Value, user_summary: &Value) -> StepsRecord {
    StepsRecord {
        id: None,
        email: email.to_owned(),
        date,
        total_steps: Some(total_steps(user_summary)),
        hourly_data: hourly_series(steps_raw),
        full_data: json!({
            "steps_data": steps_raw,
            "user_summary": user_summary,
        }),
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_defaults_to_zero_when_summary_is_missing() {
        assert_eq!(total_steps(&Value::Null), 0);
        assert_eq!(total_steps(&json!({"totalSteps": 8421})), 8421);
    }

    #[test]
    fn non_list_series_is_replaced_by_an_empty_one() {
        assert_eq!(hourly_series(&json!({"unexpected": true})), json!([]));
        assert_eq!(hourly_series(&json!([{"steps": 12}])), json!([{"steps": 12}]));
    }
}
