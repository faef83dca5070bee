//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{Partition, calibration_subset, group_queries, partition};
pub use processor::{GroupResult, process_group};
