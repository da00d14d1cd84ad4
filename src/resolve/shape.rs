use serde_json::Value;

static JSON_NULL: Value = Value::Null;

/// Collapse the provider's list-or-object ambiguity before field resolution.
///
/// Several endpoints return a single day's document either as a bare object
/// or as a one-element list depending on API revision. A list collapses to
/// its first object element; anything that is not an object collapses to
/// `Null`, which every downstream resolver treats as "no data".
pub fn daily_object(raw: &Value) -> &Value {
    match raw {
        Value::Object(_) => raw,
        Value::Array(items) => items.first().filter(|v| v.is_object()).unwrap_or(&JSON_NULL),
        _ => &JSON_NULL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_passes_through() {
        let doc = json!({"a": 1});
        assert_eq!(daily_object(&doc), &doc);
    }

    #[test]
    fn list_collapses_to_first_object() {
        let doc = json!([{"a": 1}, {"a": 2}]);
        assert_eq!(daily_object(&doc), &json!({"a": 1}));
    }

    #[test]
    fn empty_list_and_scalars_collapse_to_null() {
        assert!(daily_object(&json!([])).is_null());
        assert!(daily_object(&json!(["not-an-object"])).is_null());
        assert!(daily_object(&json!(42)).is_null());
        assert!(daily_object(&Value::Null).is_null());
    }
}
