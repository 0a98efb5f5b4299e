//! CSV type conversions for ddbimport item values.
//!
//! This crate converts the raw text of CSV fields into DynamoDB
//! [`ItemValue`](import_core::ItemValue)s according to per-column
//! [`FieldKind`](import_core::FieldKind) rules.
//!
//! # Example
//!
//! ```ignore
//! use csv_types::CsvStringWithKind;
//! use import_core::FieldKind;
//!
//! let value = CsvStringWithKind::new("42", FieldKind::Number).to_item_value()?;
//! ```

pub mod reverse;

pub use reverse::CsvStringWithKind;
pub use reverse::{csv_string_to_item_value, fallback_item_value, CsvParseError};
