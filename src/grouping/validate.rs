//! Parsing of dynamically shaped JSON input into typed record sets.
//!
//! Checks run in input order: a set's own fields first, then each of its
//! records, then the next set. The first violation aborts the parse.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::GroupingConfig;
use crate::error::GroupError;
use crate::grouping::types::{LabeledRecordSet, Record, StopNumber};

/// Name of a JSON value's kind, as reported in type errors.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(field: &str, expected: &'static str, context: String, found: &Value) -> GroupError {
    GroupError::Type {
        field: field.to_string(),
        expected,
        context,
        found: found.to_string(),
        found_type: json_type(found),
    }
}

fn label_context(label: &str) -> String {
    format!("the data for key \"{label}\"")
}

/// Rejects labels that are empty or collide with the stop number field.
pub(crate) fn check_label(label: &str, config: &GroupingConfig) -> Result<(), GroupError> {
    if label.is_empty() {
        return Err(GroupError::InvalidLabel {
            label: label.to_string(),
            reason: "label must not be empty".to_string(),
        });
    }
    if label == config.stop_number_field {
        return Err(GroupError::InvalidLabel {
            label: label.to_string(),
            reason: format!(
                "label is reserved for the \"{}\" field",
                config.stop_number_field
            ),
        });
    }
    Ok(())
}

/// Parses the whole grouping input: a JSON array of labeled sets.
///
/// # Errors
///
/// Returns the first [`GroupError`] found, scanning sets in order and each
/// set's records in order.
pub fn parse_labeled_sets(
    input: &Value,
    config: &GroupingConfig,
) -> Result<Vec<LabeledRecordSet>, GroupError> {
    let Some(pairs) = input.as_array() else {
        return Err(type_error(
            "input",
            "array",
            "grouping input".to_string(),
            input,
        ));
    };

    let mut seen = HashSet::new();
    let mut sets = Vec::with_capacity(pairs.len());

    for (index, pair) in pairs.iter().enumerate() {
        let context = format!("labeled set #{index}");
        sets.push(parse_set(pair, &context, config, &mut seen)?);
    }

    Ok(sets)
}

fn parse_set(
    pair: &Value,
    context: &str,
    config: &GroupingConfig,
    seen: &mut HashSet<String>,
) -> Result<LabeledRecordSet, GroupError> {
    let Some(object) = pair.as_object() else {
        return Err(type_error("entry", "object", context.to_string(), pair));
    };

    let label_value = object
        .get(&config.label_field)
        .ok_or_else(|| GroupError::MissingField {
            field: config.label_field.clone(),
            context: context.to_string(),
        })?;
    let records_value = object
        .get(&config.records_field)
        .ok_or_else(|| GroupError::MissingField {
            field: config.records_field.clone(),
            context: context.to_string(),
        })?;

    let Some(label) = label_value.as_str() else {
        return Err(type_error(
            &config.label_field,
            "string",
            context.to_string(),
            label_value,
        ));
    };
    let Some(items) = records_value.as_array() else {
        return Err(type_error(
            &config.records_field,
            "array",
            context.to_string(),
            records_value,
        ));
    };

    check_label(label, config)?;
    if !seen.insert(label.to_string()) {
        return Err(GroupError::DuplicateLabel {
            label: label.to_string(),
        });
    }

    let records = items
        .iter()
        .map(|item| Record::from_value(label, item, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LabeledRecordSet::new(label, records))
}

impl LabeledRecordSet {
    /// Parses a single `{ <label_field>: "...", <records_field>: [...] }` object.
    pub fn from_value(value: &Value, config: &GroupingConfig) -> Result<Self, GroupError> {
        parse_set(value, "labeled set", config, &mut HashSet::new())
    }
}

impl Record {
    /// Parses one record belonging to the set labeled `label`.
    pub fn from_value(label: &str, value: &Value, config: &GroupingConfig) -> Result<Self, GroupError> {
        let Some(object) = value.as_object() else {
            return Err(type_error("record", "object", label_context(label), value));
        };
        Self::from_map(label, object.clone(), config)
    }

    /// Builds a record from an owned field map, validating its stop number.
    pub fn from_map(
        label: &str,
        fields: Map<String, Value>,
        config: &GroupingConfig,
    ) -> Result<Self, GroupError> {
        let field = &config.stop_number_field;
        let raw = fields.get(field).ok_or_else(|| GroupError::MissingField {
            field: field.clone(),
            context: label_context(label),
        })?;
        let Some(raw) = raw.as_str() else {
            return Err(type_error(field, "string", label_context(label), raw));
        };
        let stop_number = StopNumber::parse(label, field, raw)?;

        Ok(Self {
            stop_field: Arc::from(field.as_str()),
            stop_number,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> GroupingConfig {
        GroupingConfig::default()
    }

    #[test]
    fn test_parses_valid_input() {
        let input = json!([
            { "key": "inspections", "data": [{ "stopNumber": "3", "cases": 145 }] },
            { "key": "notes", "data": [] }
        ]);
        let sets = parse_labeled_sets(&input, &config()).unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].label(), "inspections");
        assert_eq!(sets[0].records()[0].stop_number().as_str(), "3");
        assert_eq!(sets[0].records()[0].get("cases"), Some(&json!(145)));
        assert!(sets[1].records().is_empty());
    }

    #[test]
    fn test_input_must_be_array() {
        let err = parse_labeled_sets(&json!({ "key": "x" }), &config()).unwrap_err();
        assert!(matches!(err, GroupError::Type { expected: "array", .. }));
    }

    #[test]
    fn test_missing_label_reported_before_missing_records() {
        let err = parse_labeled_sets(&json!([{}]), &config()).unwrap_err();
        assert_eq!(
            err,
            GroupError::MissingField {
                field: "key".to_string(),
                context: "labeled set #0".to_string()
            }
        );
    }

    #[test]
    fn test_missing_records_reported_before_label_type() {
        let err = parse_labeled_sets(&json!([{ "key": 7 }]), &config()).unwrap_err();
        assert_eq!(
            err,
            GroupError::MissingField {
                field: "data".to_string(),
                context: "labeled set #0".to_string()
            }
        );
    }

    #[test]
    fn test_label_type_reported_before_records_type() {
        let err = parse_labeled_sets(&json!([{ "key": 7, "data": 5 }]), &config()).unwrap_err();
        assert!(matches!(
            err,
            GroupError::Type { ref field, expected: "string", .. } if field == "key"
        ));

        let err = parse_labeled_sets(&json!([{ "key": "a", "data": 5 }]), &config()).unwrap_err();
        assert!(matches!(
            err,
            GroupError::Type { ref field, expected: "array", .. } if field == "data"
        ));
    }

    #[test]
    fn test_missing_records_reported_before_any_record() {
        let input = json!([
            { "key": "a", "data": [{ "stopNumber": "0" }] },
            { "key": "b" }
        ]);
        // The bad record in "a" comes first in input order.
        let err = parse_labeled_sets(&input, &config()).unwrap_err();
        assert!(matches!(err, GroupError::Range { .. }));

        let input = json!([{ "key": "b" }]);
        let err = parse_labeled_sets(&input, &config()).unwrap_err();
        assert!(matches!(err, GroupError::MissingField { ref field, .. } if field == "data"));
    }

    #[test]
    fn test_non_string_label() {
        let err = parse_labeled_sets(&json!([{ "key": 7, "data": [] }]), &config()).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, GroupError::Type { found_type: "number", .. }));
        assert!(msg.contains("Found: 7"));
    }

    #[test]
    fn test_non_array_records() {
        for data in [json!("x"), json!({ "stopNumber": "1" }), json!(null)] {
            let input = json!([{ "key": "a", "data": data }]);
            let err = parse_labeled_sets(&input, &config()).unwrap_err();
            assert!(matches!(err, GroupError::Type { expected: "array", .. }));
        }
    }

    #[test]
    fn test_record_errors_name_label() {
        let cases = [
            (json!({}), "missing_field"),
            (json!({ "stopNumber": 5 }), "type"),
            (json!({ "stopNumber": "12a" }), "format"),
            (json!({ "stopNumber": "0" }), "range"),
            (json!("5"), "type"),
        ];
        for (record, kind) in cases {
            let input = json!([{ "key": "signatures", "data": [record] }]);
            let err = parse_labeled_sets(&input, &config()).unwrap_err();
            assert_eq!(err.kind(), kind);
            assert!(err.to_string().contains("signatures"), "{err}");
        }
    }

    #[test]
    fn test_format_error_mentions_value() {
        let input = json!([{ "key": "a", "data": [{ "stopNumber": "12a" }] }]);
        let err = parse_labeled_sets(&input, &config()).unwrap_err();
        assert!(err.to_string().contains("12a"));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let input = json!([
            { "key": "a", "data": [] },
            { "key": "a", "data": [{ "stopNumber": "x" }] }
        ]);
        let err = parse_labeled_sets(&input, &config()).unwrap_err();
        assert_eq!(
            err,
            GroupError::DuplicateLabel {
                label: "a".to_string()
            }
        );
    }

    #[test]
    fn test_reserved_and_empty_labels_rejected() {
        for label in ["", "stopNumber"] {
            let input = json!([{ "key": label, "data": [] }]);
            let err = parse_labeled_sets(&input, &config()).unwrap_err();
            assert_eq!(err.kind(), "invalid_label");
        }
    }

    #[test]
    fn test_custom_field_names() {
        let config = GroupingConfig {
            label_field: "name".to_string(),
            records_field: "rows".to_string(),
            stop_number_field: "stopNbr".to_string(),
        };
        let value = json!({ "name": "associates", "rows": [{ "stopNbr": "2" }] });
        let set = LabeledRecordSet::from_value(&value, &config).unwrap();
        assert_eq!(set.label(), "associates");
        assert_eq!(set.records()[0].stop_number().as_str(), "2");
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type(&json!(null)), "null");
        assert_eq!(json_type(&json!(true)), "boolean");
        assert_eq!(json_type(&json!([])), "array");
        assert_eq!(json_type(&json!({})), "object");
    }
}
