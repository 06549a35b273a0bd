pub mod config;
pub mod error;
pub mod grouping;
pub mod output;
pub mod stats;

pub use config::GroupingConfig;
pub use error::GroupError;
pub use grouping::{StopAggregate, StopGrouper, group_by_stop_number};
