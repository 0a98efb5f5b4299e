//! Batch sink abstraction.
//!
//! This crate defines the `BatchSink` trait that the import pipeline writes
//! through. `DynamoBatchWriter` implements it with `BatchWriteItem` calls;
//! `DryRunSink` accepts every batch without writing anything.

mod dry_run;
mod dynamodb;
mod traits;

pub use dry_run::DryRunSink;
pub use dynamodb::{item_to_attribute_map, item_value_to_attribute_value, DynamoBatchWriter};
pub use traits::BatchSink;
