//! Core types for the ddbimport tool.
//!
//! This crate provides the foundational types shared by the local import
//! pipeline and the remote (Step Functions) execution path:
//!
//! - [`ItemValue`] - DynamoDB attribute values, serializable as DynamoDB JSON
//! - [`Item`] - A converted CSV row, with attributes kept in column order
//! - [`FieldKind`] / [`ImportSchema`] - Per-column conversion rules
//! - [`Delimiter`] - The supported CSV delimiters
//! - [`JobDescription`] - The complete, serializable description of an import
//!
//! # Architecture
//!
//! ```text
//! import-core (this crate)
//!    │
//!    ├─── csv-types     (CSV text -> ItemValue conversion rules)
//!    ├─── dynamo-sink   (ItemValue -> aws-sdk-dynamodb AttributeValue)
//!    ├─── csv-source    (local import pipeline)
//!    └─── sfn-remote    (submits JobDescription to Step Functions)
//! ```

pub mod delimiter;
pub mod error;
pub mod job;
pub mod schema;
pub mod values;

pub use delimiter::Delimiter;
pub use error::ConfigError;
pub use job::{
    JobConfiguration, JobDescription, JobSource, JobTarget, SourceLocation,
    DEFAULT_CONCURRENCY, DEFAULT_INVOCATION_DURATION_SECS,
};
pub use schema::{FieldKind, ImportSchema, SchemaBuilder};
pub use values::{Batch, Item, ItemValue, MAX_BATCH_SIZE};
