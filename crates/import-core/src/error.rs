//! Configuration errors.

use thiserror::Error;

/// Errors raised while building or validating an import configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required parameter was not supplied.
    #[error("Missing required parameter: {0}")]
    Missing(&'static str),

    /// Parameters that cannot be combined were supplied together.
    #[error("Conflicting parameters: {0}")]
    Conflict(String),

    /// A column was given two different conversion kinds.
    #[error("Column '{column}' is configured as both {first} and {second}")]
    ConflictingFieldKind {
        column: String,
        first: &'static str,
        second: &'static str,
    },

    /// An explicit column list named the same column twice.
    #[error("Column '{0}' appears more than once in the column list")]
    DuplicateColumn(String),

    /// A numeric parameter was outside its allowed range.
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
