//! ddbimport library
//!
//! Bulk import of CSV files into DynamoDB tables.
//!
//! # Execution modes
//!
//! - Local: the file (on disk or in S3) is read and converted in-process and
//!   written by a pool of concurrent `BatchWriteItem` workers.
//! - Remote: the same job description is submitted to the `ddbimport` Step
//!   Function, which is polled until the import finishes.
//!
//! # Workspace crates
//!
//! - `import_core` - item model, conversion schema, job description
//! - `csv_types` - CSV text to DynamoDB value conversion
//! - `ddbimport_file` - local and S3 input streams
//! - `dynamo_sink` - batch sink trait and DynamoDB writer
//! - `csv_source` - converter, bounded queue, writer pool, local import
//! - `sfn_remote` - Step Functions job adapter
//!
//! # CLI Usage
//!
//! ```bash
//! # Local file
//! ddbimport --table-region eu-west-2 --table-name data \
//!   --input-file data.csv --numeric-fields year,rank
//!
//! # S3 object, imported by the Step Function
//! ddbimport --table-region eu-west-2 --table-name data \
//!   --bucket-region eu-west-2 --bucket-name imports --bucket-key data.csv --remote
//! ```

pub mod config;
mod run;

pub use config::{ImportArgs, ImportPlan};
pub use run::{execute, run_local, run_remote_import, ImportOutcome};
