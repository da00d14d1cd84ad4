use chrono::NaiveDate;
use serde_json::Value;

use super::accessor::FieldSpec;
use super::shape;
use crate::models::records::BodyBatteryRecord;

const CHARGED: FieldSpec = FieldSpec::number(&[&["charged"]]);
const DRAINED: FieldSpec = FieldSpec::number(&[&["drained"]]);

/// The body-battery endpoint answers a date range with a list of daily
/// entries; a single-day query still comes back as a one-element list.
pub fn record(email: &str, date: NaiveDate, bb_raw: &Value) -> BodyBatteryRecord {
    let daily = shape::daily_object(bb_raw);
    BodyBatteryRecord {
        id: None,
        email: email.to_owned(),
        date,
        charged: CHARGED.resolve_i64(daily),
        drained: DRAINED.resolve_i64(daily),
        full_data: bb_raw.clone(),
        created_at: None,
        updated_at: None,
    }
}
