//! CSV delimiter selection.

use serde::{Deserialize, Serialize};

/// The field delimiter of the source file.
///
/// Serialized as the delimiter character itself (`","` or `"\t"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    /// Parse a delimiter name. Accepts `comma`, `tab`, or the literal
    /// characters; anything else falls back to comma.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "tab" | "\t" => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
        }
    }
}

impl From<Delimiter> for String {
    fn from(delimiter: Delimiter) -> Self {
        delimiter.as_str().to_string()
    }
}

impl From<String> for Delimiter {
    fn from(value: String) -> Self {
        Delimiter::parse_lenient(&value)
    }
}
