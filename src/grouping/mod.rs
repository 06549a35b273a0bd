//! Regrouping of labeled record sets by stop number.
//!
//! Input is validated into typed [`LabeledRecordSet`]s, then every record is
//! filed into one [`StopAggregate`] per distinct stop number, sorted by the
//! stop number's numeric value.

pub mod group;
pub mod types;
pub mod utility;
pub mod validate;

pub use group::{StopGrouper, group_by_stop_number};
pub use types::{LabeledRecordSet, Record, StopAggregate, StopNumber};
pub use validate::parse_labeled_sets;
