use serde_json::Value;

/// Total floors ascended for a day.
///
/// The `floorValuesArray` entries are `[interval_start, interval_end,
/// ascended, descended]` tuples; only the third element is consumed. An
/// all-zero sum is reported as absent rather than zero: the upstream format
/// does not distinguish "no sensor data" from "measured zero", and absent
/// is the conservative reading. A bare scalar payload is passed through as
/// the total under the same zero-is-absent policy.
pub fn total_ascended(floors_doc: &Value) -> Option<i64> {
    if let Some(scalar) = floors_doc.as_f64() {
        let total = scalar.round() as i64;
        return (total != 0).then_some(total);
    }

    let entries = floors_doc.get("floorValuesArray")?.as_array()?;
    let total: f64 = entries
        .iter()
        .filter_map(|entry| {
            let tuple = entry.as_array()?;
            tuple.get(2)?.as_f64()
        })
        .sum();

    let total = total.round() as i64;
    (total > 0).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sums_the_ascended_column_only() {
        let doc = json!({"floorValuesArray": [[0, 1, 5, 2], [1, 2, 0, 1]]});
        assert_eq!(total_ascended(&doc), Some(5));
    }

    #[test]
    fn zero_sum_reports_absent_not_zero() {
        let doc = json!({"floorValuesArray": [[0, 1, 0, 0]]});
        assert_eq!(total_ascended(&doc), None);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let doc = json!({"floorValuesArray": [[0, 1], "bad", [1, 2, 3, 0], {"x": 1}]});
        assert_eq!(total_ascended(&doc), Some(3));
    }

    #[test]
    fn scalar_payload_passes_through() {
        assert_eq!(total_ascended(&json!(12)), Some(12));
        assert_eq!(total_ascended(&json!(0)), None);
    }

    #[test]
    fn missing_document_is_absent() {
        assert_eq!(total_ascended(&Value::Null), None);
        assert_eq!(total_ascended(&json!({"other": 1})), None);
    }
}
