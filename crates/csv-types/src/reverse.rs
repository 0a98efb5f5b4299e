//! Reverse conversion: CSV string → ItemValue.
//!
//! This module converts the raw text of a CSV field into a DynamoDB item
//! value according to the column's [`FieldKind`].

use base64::Engine;
use import_core::{FieldKind, ItemValue};
use std::collections::HashMap;
use thiserror::Error;

/// A CSV string paired with the conversion kind of its column.
#[derive(Debug, Clone, Copy)]
pub struct CsvStringWithKind<'a> {
    /// The CSV string value
    pub value: &'a str,
    /// The target conversion kind
    pub kind: FieldKind,
}

impl<'a> CsvStringWithKind<'a> {
    pub fn new(value: &'a str, kind: FieldKind) -> Self {
        Self { value, kind }
    }

    /// Convert, failing on text that does not fit the kind.
    pub fn to_item_value(&self) -> Result<ItemValue, CsvParseError> {
        csv_string_to_item_value(self.value, self.kind)
    }

    /// Convert, substituting the kind's fallback value on failure.
    ///
    /// The parse error is returned alongside so callers can report it.
    pub fn to_item_value_lenient(&self) -> (ItemValue, Option<CsvParseError>) {
        match self.to_item_value() {
            Ok(value) => (value, None),
            Err(e) => (fallback_item_value(self.kind), Some(e)),
        }
    }
}

/// Error type for CSV parsing failures.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to parse '{value}' as {expected_kind}: {message}")]
pub struct CsvParseError {
    pub message: String,
    pub value: String,
    pub expected_kind: FieldKind,
}

impl CsvParseError {
    fn new(value: &str, expected_kind: FieldKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            value: value.to_string(),
            expected_kind,
        }
    }
}

/// Parse a CSV string value according to the column kind.
///
/// Callers skip empty fields before converting; an empty string is never
/// stored as an attribute.
pub fn csv_string_to_item_value(value: &str, kind: FieldKind) -> Result<ItemValue, CsvParseError> {
    match kind {
        FieldKind::String => Ok(ItemValue::String(value.to_string())),

        // DynamoDB validates numbers on write; the text is passed through as-is
        FieldKind::Number => Ok(ItemValue::Number(value.to_string())),

        FieldKind::Boolean => {
            if value.eq_ignore_ascii_case("true") {
                Ok(ItemValue::Bool(true))
            } else if value.eq_ignore_ascii_case("false") {
                Ok(ItemValue::Bool(false))
            } else {
                Err(CsvParseError::new(value, kind, "Invalid boolean value"))
            }
        }

        FieldKind::Map => serde_json::from_str::<HashMap<String, ItemValue>>(value)
            .map(ItemValue::Map)
            .map_err(|e| CsvParseError::new(value, kind, format!("Invalid DynamoDB JSON: {e}"))),

        FieldKind::Binary => base64::engine::general_purpose::STANDARD
            .decode(value)
            .map(ItemValue::Binary)
            .map_err(|e| CsvParseError::new(value, kind, format!("Invalid base64: {e}"))),
    }
}

/// The value stored when a field cannot be converted.
pub fn fallback_item_value(kind: FieldKind) -> ItemValue {
    match kind {
        FieldKind::String => ItemValue::String(String::new()),
        FieldKind::Number => ItemValue::Number(String::new()),
        FieldKind::Boolean => ItemValue::Bool(false),
        FieldKind::Map => ItemValue::Map(HashMap::new()),
        FieldKind::Binary => ItemValue::Binary(Vec::new()),
    }
}
