//! Data types used by the grouping pipeline.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::GroupError;
use crate::grouping::utility::{cmp_numeric, is_digits, is_zero};

/// A validated stop number: one or more decimal digits, numerically above zero.
///
/// Equality is on the raw text, so `"01"` and `"1"` are different stop
/// numbers. Ordering by value goes through [`StopNumber::cmp_numeric`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopNumber(String);

impl StopNumber {
    /// Validates `raw` as a stop number belonging to the set labeled `label`.
    ///
    /// # Errors
    ///
    /// [`GroupError::Format`] if `raw` is not all digits, [`GroupError::Range`]
    /// if it is zero.
    pub fn parse(label: &str, field: &str, raw: &str) -> Result<Self, GroupError> {
        if !is_digits(raw) {
            return Err(GroupError::Format {
                field: field.to_string(),
                label: label.to_string(),
                value: raw.to_string(),
            });
        }
        if is_zero(raw) {
            return Err(GroupError::Range {
                label: label.to_string(),
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn cmp_numeric(&self, other: &StopNumber) -> Ordering {
        cmp_numeric(&self.0, &other.0)
    }
}

impl fmt::Display for StopNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StopNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One input record: its validated stop number plus every field it arrived
/// with, the stop number field included. Serializes as the original object.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) stop_field: Arc<str>,
    pub(crate) stop_number: StopNumber,
    pub(crate) fields: Map<String, Value>,
}

impl Record {
    pub fn stop_number(&self) -> &StopNumber {
        &self.stop_number
    }

    /// Name of the field the stop number was read from.
    pub fn stop_field(&self) -> &str {
        &self.stop_field
    }

    /// Returns a payload field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// A label and the records filed under it, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecordSet {
    pub(crate) label: String,
    pub(crate) records: Vec<Record>,
}

impl LabeledRecordSet {
    pub fn new(label: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Every record sharing one stop number, bucketed by label.
///
/// Holds a bucket for each label of the input it was built from, in input
/// label order, even when that bucket is empty.
///
/// Serializes as a flat object:
/// ```json
/// { "stopNumber": "1", "inspections": [ ... ], "notes": [] }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StopAggregate {
    stop_field: Arc<str>,
    stop_number: StopNumber,
    groups: Vec<(String, Vec<Record>)>,
}

impl StopAggregate {
    pub(crate) fn seeded(stop_field: Arc<str>, stop_number: StopNumber, labels: &[&str]) -> Self {
        Self {
            stop_field,
            stop_number,
            groups: labels
                .iter()
                .map(|label| (label.to_string(), Vec::new()))
                .collect(),
        }
    }

    pub(crate) fn push(&mut self, label_index: usize, record: Record) {
        self.groups[label_index].1.push(record);
    }

    pub fn stop_number(&self) -> &StopNumber {
        &self.stop_number
    }

    /// Name of the field the stop number is written under when serialized.
    pub fn stop_field(&self) -> &str {
        &self.stop_field
    }

    /// Records filed under `label`, or `None` if the label was not in the input.
    pub fn records(&self, label: &str) -> Option<&[Record]> {
        self.groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, records)| records.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(label, _)| label.as_str())
    }

    /// Iterates `(label, records)` pairs in input label order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.groups
            .iter()
            .map(|(label, records)| (label.as_str(), records.as_slice()))
    }

    /// Total records across every label.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }
}

impl Serialize for StopAggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        map.serialize_entry(&*self.stop_field, &self.stop_number)?;
        for (label, records) in &self.groups {
            map.serialize_entry(label, records)?;
        }
        map.end()
    }
}
