use serde_json::Value;

/// Type predicate a resolved value has to satisfy before it is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    NonEmptyArray,
}

/// An ordered fallback chain of key paths for one logical field.
///
/// The provider nests the same metric in different places depending on
/// device, firmware and API revision. Paths are tried in declaration order
/// and the first value that exists and matches `kind` wins. A path that
/// dead-ends (missing key, non-object midway) counts as "not present";
/// resolution itself never fails.
pub struct FieldSpec {
    pub paths: &'static [&'static [&'static str]],
    pub kind: ValueKind,
}

impl FieldSpec {
    pub const fn number(paths: &'static [&'static [&'static str]]) -> Self {
        Self {
            paths,
            kind: ValueKind::Number,
        }
    }

    pub const fn text(paths: &'static [&'static [&'static str]]) -> Self {
        Self {
            paths,
            kind: ValueKind::Text,
        }
    }

    pub const fn non_empty_array(paths: &'static [&'static [&'static str]]) -> Self {
        Self {
            paths,
            kind: ValueKind::NonEmptyArray,
        }
    }

    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.paths
            .iter()
            .find_map(|path| walk(doc, path).filter(|hit| matches_kind(hit, self.kind)))
    }

    pub fn resolve_f64(&self, doc: &Value) -> Option<f64> {
        self.resolve(doc).and_then(Value::as_f64)
    }

    /// Numeric resolution rounded to the nearest integer, for fields the
    /// provider sometimes reports fractionally (e.g. fitness age).
    pub fn resolve_i64(&self, doc: &Value) -> Option<i64> {
        self.resolve(doc)
            .and_then(Value::as_f64)
            .map(|v| v.round() as i64)
    }

    pub fn resolve_string(&self, doc: &Value) -> Option<String> {
        self.resolve(doc).and_then(Value::as_str).map(str::to_owned)
    }
}

fn walk<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, key| node.get(key))
}

fn matches_kind(value: &Value, kind: ValueKind) -> bool {
    match kind {
        ValueKind::Number => value.is_number(),
        ValueKind::Text => value.as_str().is_some_and(|s| !s.is_empty()),
        ValueKind::NonEmptyArray => value.as_array().is_some_and(|a| !a.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCORE: FieldSpec = FieldSpec::number(&[
        &["summary", "score"],
        &["score"],
        &["legacyScore"],
    ]);

    #[test]
    fn first_matching_path_wins() {
        let doc = json!({"summary": {"score": 81}, "score": 12});
        assert_eq!(SCORE.resolve_i64(&doc), Some(81));
    }

    #[test]
    fn falls_back_in_declaration_order() {
        let doc = json!({"score": 12, "legacyScore": 99});
        assert_eq!(SCORE.resolve_i64(&doc), Some(12));

        let doc = json!({"legacyScore": 99});
        assert_eq!(SCORE.resolve_i64(&doc), Some(99));
    }

    #[test]
    fn wrong_type_is_skipped_not_an_error() {
        // The preferred location holds a string, so resolution moves on.
        let doc = json!({"summary": {"score": "n/a"}, "score": 40});
        assert_eq!(SCORE.resolve_i64(&doc), Some(40));
    }

    #[test]
    fn dead_end_paths_resolve_to_absent() {
        let doc = json!({"summary": "flat string, not an object"});
        assert_eq!(SCORE.resolve(&doc), None);
        assert_eq!(SCORE.resolve(&Value::Null), None);
    }

    #[test]
    fn text_and_array_predicates() {
        const LABEL: FieldSpec = FieldSpec::text(&[&["label"]]);
        const SERIES: FieldSpec = FieldSpec::non_empty_array(&[&["values"]]);

        assert_eq!(
            LABEL.resolve_string(&json!({"label": "Productive"})),
            Some("Productive".to_owned())
        );
        assert_eq!(LABEL.resolve_string(&json!({"label": ""})), None);
        assert!(SERIES.resolve(&json!({"values": [1, 2]})).is_some());
        assert!(SERIES.resolve(&json!({"values": []})).is_none());
    }

    #[test]
    fn fractional_values_round_on_integer_extraction() {
        const AGE: FieldSpec = FieldSpec::number(&[&["fitnessAge"]]);
        assert_eq!(AGE.resolve_i64(&json!({"fitnessAge": 31.6})), Some(32));
    }
}
