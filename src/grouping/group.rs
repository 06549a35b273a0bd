use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::GroupingConfig;
use crate::error::GroupError;
use crate::grouping::types::{LabeledRecordSet, Record, StopAggregate};
use crate::grouping::validate::{check_label, parse_labeled_sets};

/// Regroups labeled record sets by stop number.
///
/// Holds only the field-name configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct StopGrouper {
    config: GroupingConfig,
}

impl StopGrouper {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Validates raw JSON input and groups it.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure in input order. Nothing is
    /// grouped unless the whole input is valid.
    #[tracing::instrument(skip_all, fields(stop_field = %self.config.stop_number_field))]
    pub fn group_value(&self, input: &Value) -> Result<Vec<StopAggregate>, GroupError> {
        let sets = parse_labeled_sets(input, &self.config).inspect_err(|e| {
            warn!(kind = e.kind(), error = %e, "Grouping input rejected");
        })?;
        Ok(self.group_validated(&sets))
    }

    /// Groups already-parsed sets, re-checking that labels are usable and unique.
    ///
    /// Records parsed under a different stop number field are re-validated
    /// against this grouper's field, so output always keys on the configured one.
    pub fn group(&self, sets: &[LabeledRecordSet]) -> Result<Vec<StopAggregate>, GroupError> {
        let mut seen = HashSet::new();
        for set in sets {
            check_label(set.label(), &self.config)?;
            if !seen.insert(set.label()) {
                return Err(GroupError::DuplicateLabel {
                    label: set.label().to_string(),
                });
            }
        }

        let field = self.config.stop_number_field.as_str();
        let same_field = sets
            .iter()
            .flat_map(LabeledRecordSet::records)
            .all(|record| record.stop_field() == field);
        if same_field {
            return Ok(self.group_validated(sets));
        }

        debug!(stop_field = field, "Re-keying records parsed under another stop field");
        let rekeyed = sets
            .iter()
            .map(|set| {
                set.records()
                    .iter()
                    .map(|record| Record::from_map(set.label(), record.fields().clone(), &self.config))
                    .collect::<Result<Vec<_>, _>>()
                    .map(|records| LabeledRecordSet::new(set.label(), records))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.group_validated(&rekeyed))
    }

    fn group_validated(&self, sets: &[LabeledRecordSet]) -> Vec<StopAggregate> {
        let stop_field: Arc<str> = Arc::from(self.config.stop_number_field.as_str());
        let labels: Vec<&str> = sets.iter().map(LabeledRecordSet::label).collect();

        // Raw stop number text -> position in `aggregates` (first-encounter order).
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut aggregates: Vec<StopAggregate> = Vec::new();

        for (label_index, set) in sets.iter().enumerate() {
            for record in set.records() {
                let raw = record.stop_number().as_str();
                let slot = match slots.get(raw) {
                    Some(&slot) => slot,
                    None => {
                        debug!(stop_number = raw, label = set.label(), "New stop");
                        aggregates.push(StopAggregate::seeded(
                            stop_field.clone(),
                            record.stop_number().clone(),
                            &labels,
                        ));
                        slots.insert(raw, aggregates.len() - 1);
                        aggregates.len() - 1
                    }
                };
                aggregates[slot].push(label_index, record.clone());
            }
        }

        // Stable, so numerically equal keys ("01", "1") keep first-encounter order.
        aggregates.sort_by(|a, b| a.stop_number().cmp_numeric(b.stop_number()));

        debug!(
            labels = labels.len(),
            stops = aggregates.len(),
            "Grouped records by stop number"
        );

        aggregates
    }
}

/// Groups JSON input using the default field names (`key`, `data`, `stopNumber`).
pub fn group_by_stop_number(input: &Value) -> Result<Vec<StopAggregate>, GroupError> {
    StopGrouper::default().group_value(input)
}
