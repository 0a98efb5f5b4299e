//! Per-column conversion rules.
//!
//! An [`ImportSchema`] is built once through [`SchemaBuilder`], validated, and
//! then shared read-only by the converter.

use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

/// How the raw text of a column is converted into an item value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Stored as a DynamoDB string (the default for unlisted columns)
    #[default]
    String,
    /// Stored as a DynamoDB number, text passed through unvalidated
    Number,
    /// `true`/`false` in any case; anything else is false
    Boolean,
    /// DynamoDB JSON object parsed into a nested map
    Map,
    /// Base64 text decoded into binary
    Binary,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Map => "map",
            FieldKind::Binary => "binary",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable, validated conversion schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSchema {
    rules: HashMap<String, FieldKind>,
    columns: Option<Vec<String>>,
    key_columns: Option<HashSet<String>>,
}

impl ImportSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Conversion kind for a column, defaulting to string.
    pub fn kind_of(&self, column: &str) -> FieldKind {
        self.rules.get(column).copied().unwrap_or_default()
    }

    /// Explicit column order. When set, no header row is read from the input.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Whether a column survives the key-column projection.
    pub fn includes(&self, column: &str) -> bool {
        match &self.key_columns {
            Some(keys) => keys.contains(column),
            None => true,
        }
    }

    /// Columns configured with the given kind, sorted for stable output.
    pub fn columns_of_kind(&self, kind: FieldKind) -> Vec<String> {
        let mut columns: Vec<String> = self
            .rules
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(column, _)| column.clone())
            .collect();
        columns.sort();
        columns
    }
}

/// Collects field rules before producing an [`ImportSchema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    rules: Vec<(String, FieldKind)>,
    columns: Option<Vec<String>>,
    key_columns: Option<Vec<String>>,
}

impl SchemaBuilder {
    pub fn fields<I, S>(mut self, kind: FieldKind, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .extend(columns.into_iter().map(|c| (c.into(), kind)));
        self
    }

    pub fn number_fields<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(FieldKind::Number, columns)
    }

    pub fn boolean_fields<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(FieldKind::Boolean, columns)
    }

    pub fn map_fields<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(FieldKind::Map, columns)
    }

    pub fn binary_fields<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields(FieldKind::Binary, columns)
    }

    /// Use an explicit column order instead of reading a header row.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict converted items to these columns.
    pub fn key_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the collected rules and produce the schema.
    ///
    /// Blank column names are ignored, so splitting an empty flag value yields
    /// no rules. Empty column or key-column lists are treated as unset.
    pub fn build(self) -> Result<ImportSchema, ConfigError> {
        let mut rules: HashMap<String, FieldKind> = HashMap::new();
        for (column, kind) in self.rules {
            let column = column.trim().to_string();
            if column.is_empty() {
                continue;
            }
            match rules.get(&column) {
                Some(existing) if *existing != kind => {
                    return Err(ConfigError::ConflictingFieldKind {
                        column,
                        first: existing.name(),
                        second: kind.name(),
                    });
                }
                _ => {
                    rules.insert(column, kind);
                }
            }
        }

        let columns = match self.columns {
            Some(columns) if !columns.is_empty() => {
                let mut seen = HashSet::new();
                for column in &columns {
                    if !seen.insert(column.as_str()) {
                        return Err(ConfigError::DuplicateColumn(column.clone()));
                    }
                }
                Some(columns)
            }
            _ => None,
        };

        let key_columns = self
            .key_columns
            .map(|keys| {
                keys.into_iter()
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect::<HashSet<_>>()
            })
            .filter(|keys| !keys.is_empty());

        Ok(ImportSchema {
            rules,
            columns,
            key_columns,
        })
    }
}
