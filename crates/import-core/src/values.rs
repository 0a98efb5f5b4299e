//! Item value representations.
//!
//! `ItemValue` mirrors the DynamoDB attribute value model. Its serde
//! representation is DynamoDB JSON, where every value is a single-key object
//! tagged with its type (`{"S": "text"}`, `{"N": "1.5"}`, `{"M": {...}}`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of items DynamoDB accepts in a single BatchWriteItem call.
pub const MAX_BATCH_SIZE: usize = 25;

/// A batch of converted items written to the store in one request.
pub type Batch = Vec<Item>;

/// A single DynamoDB attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemValue {
    /// String
    #[serde(rename = "S")]
    String(String),

    /// Number, kept as its decimal text
    #[serde(rename = "N")]
    Number(String),

    /// Binary, base64 encoded in DynamoDB JSON
    #[serde(rename = "B", with = "base64_bytes")]
    Binary(Vec<u8>),

    /// Boolean
    #[serde(rename = "BOOL")]
    Bool(bool),

    /// Null marker
    #[serde(rename = "NULL")]
    Null(bool),

    /// Nested map of attributes
    #[serde(rename = "M")]
    Map(HashMap<String, ItemValue>),

    /// Ordered list of attributes
    #[serde(rename = "L")]
    List(Vec<ItemValue>),

    /// String set
    #[serde(rename = "SS")]
    StringSet(Vec<String>),

    /// Number set
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),

    /// Binary set
    #[serde(rename = "BS", with = "base64_byte_list")]
    BinarySet(Vec<Vec<u8>>),
}

impl ItemValue {
    /// Create a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a number value from its decimal text.
    pub fn number(value: impl Into<String>) -> Self {
        Self::Number(value.into())
    }

    /// Short DynamoDB type descriptor (`S`, `N`, `M`, ...).
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::String(_) => "S",
            Self::Number(_) => "N",
            Self::Binary(_) => "B",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::Map(_) => "M",
            Self::List(_) => "L",
            Self::StringSet(_) => "SS",
            Self::NumberSet(_) => "NS",
            Self::BinarySet(_) => "BS",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&str> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, ItemValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// A converted row: attribute name to value, kept in column order.
///
/// Columns whose raw text was empty are never present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    attributes: Vec<(String, ItemValue)>,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            attributes: Vec::with_capacity(capacity),
        }
    }

    /// Append an attribute. Columns are unique, so callers insert each name once.
    pub fn insert(&mut self, name: impl Into<String>, value: ItemValue) {
        self.attributes.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&ItemValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute names in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemValue)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn into_attributes(self) -> Vec<(String, ItemValue)> {
        self.attributes
    }
}

impl FromIterator<(String, ItemValue)> for Item {
    fn from_iter<T: IntoIterator<Item = (String, ItemValue)>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

mod base64_byte_list {
    use base64::Engine;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for bytes in values {
            seq.serialize_element(&base64::engine::general_purpose::STANDARD.encode(bytes))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|encoded| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
