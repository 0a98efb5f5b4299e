//! Job descriptions.
//!
//! A [`JobDescription`] captures everything needed to run one import: where
//! the CSV lives, how its columns are converted, which table receives the
//! items and how much concurrency to use. Local imports log it as context;
//! remote imports send it, as JSON, to the Step Functions state machine.

use crate::delimiter::Delimiter;
use crate::error::ConfigError;
use crate::schema::ImportSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of concurrent writers (or remote invocations).
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Time budget of a single remote invocation, in seconds.
pub const DEFAULT_INVOCATION_DURATION_SECS: u64 = 900;

/// The complete description of an import job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub source: JobSource,
    pub configuration: JobConfiguration,
    pub target: JobTarget,
}

/// Where the CSV file is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceLocation {
    /// Object in an S3 bucket
    S3 {
        region: String,
        bucket: String,
        key: String,
    },
    /// File on the local filesystem
    Local { path: PathBuf },
}

impl SourceLocation {
    pub fn is_s3(&self) -> bool {
        matches!(self, SourceLocation::S3 { .. })
    }

    /// Get a display name for logging
    pub fn display_name(&self) -> String {
        match self {
            SourceLocation::S3 {
                region,
                bucket,
                key,
            } => format!("s3://{bucket}/{key} ({region})"),
            SourceLocation::Local { path } => path.display().to_string(),
        }
    }
}

/// Source section of the job: location plus conversion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSource {
    #[serde(flatten)]
    pub location: SourceLocation,

    #[serde(default)]
    pub numeric_fields: Vec<String>,

    #[serde(default)]
    pub boolean_fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub map_fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binary_fields: Vec<String>,

    /// Explicit column order; when empty the first row is the header
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_names: Vec<String>,

    /// Column projection; when empty every column is kept
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_columns: Vec<String>,

    #[serde(default)]
    pub delimiter: Delimiter,
}

impl JobSource {
    /// A source with no conversion rules (every column is a string).
    pub fn new(location: SourceLocation) -> Self {
        Self {
            location,
            numeric_fields: Vec::new(),
            boolean_fields: Vec::new(),
            map_fields: Vec::new(),
            binary_fields: Vec::new(),
            column_names: Vec::new(),
            key_columns: Vec::new(),
            delimiter: Delimiter::default(),
        }
    }
}

/// Execution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfiguration {
    /// Local writer count, or remote invocation fan-out
    #[serde(rename = "lambdaConcurrency")]
    pub concurrency: usize,

    /// Time budget of a single remote invocation
    #[serde(rename = "lambdaDurationSeconds")]
    pub invocation_duration_secs: u64,
}

impl Default for JobConfiguration {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            invocation_duration_secs: DEFAULT_INVOCATION_DURATION_SECS,
        }
    }
}

/// The DynamoDB table receiving the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTarget {
    pub region: String,
    pub table_name: String,
}

impl JobDescription {
    /// Check that every required value is present and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.region.is_empty() {
            return Err(ConfigError::Missing("table region"));
        }
        if self.target.table_name.is_empty() {
            return Err(ConfigError::Missing("table name"));
        }
        if self.configuration.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        match &self.source.location {
            SourceLocation::S3 {
                region,
                bucket,
                key,
            } => {
                if region.is_empty() || bucket.is_empty() || key.is_empty() {
                    return Err(ConfigError::Missing("bucket region, bucket name and bucket key"));
                }
            }
            SourceLocation::Local { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Missing("input file"));
                }
            }
        }
        self.schema().map(|_| ())
    }

    /// Remote execution reads the file from S3, so a local path is rejected.
    pub fn require_s3_source(&self) -> Result<(), ConfigError> {
        if self.source.location.is_s3() {
            Ok(())
        } else {
            Err(ConfigError::Conflict(
                "remote import requires the file to be located within an S3 bucket".to_string(),
            ))
        }
    }

    /// Build the conversion schema described by the source section.
    pub fn schema(&self) -> Result<ImportSchema, ConfigError> {
        let source = &self.source;
        ImportSchema::builder()
            .number_fields(source.numeric_fields.iter().cloned())
            .boolean_fields(source.boolean_fields.iter().cloned())
            .map_fields(source.map_fields.iter().cloned())
            .binary_fields(source.binary_fields.iter().cloned())
            .columns(source.column_names.iter().cloned())
            .key_columns(source.key_columns.iter().cloned())
            .build()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    fn s3_job() -> JobDescription {
        let mut source = JobSource::new(SourceLocation::S3 {
            region: "eu-west-2".to_string(),
            bucket: "data".to_string(),
            key: "imports/users.csv".to_string(),
        });
        source.numeric_fields = vec!["age".to_string()];
        source.boolean_fields = vec!["active".to_string()];
        source.delimiter = Delimiter::Tab;

        JobDescription {
            source,
            configuration: JobConfiguration::default(),
            target: JobTarget {
                region: "eu-west-1".to_string(),
                table_name: "users".to_string(),
            },
        }
    }

    #[test]
    fn test_wire_format_sections() {
        let json: serde_json::Value = serde_json::from_str(&s3_job().to_json().unwrap()).unwrap();

        assert_eq!(json["source"]["region"], "eu-west-2");
        assert_eq!(json["source"]["bucket"], "data");
        assert_eq!(json["source"]["key"], "imports/users.csv");
        assert_eq!(json["source"]["numericFields"][0], "age");
        assert_eq!(json["source"]["booleanFields"][0], "active");
        assert_eq!(json["source"]["delimiter"], "\t");
        assert_eq!(json["configuration"]["lambdaConcurrency"], 8);
        assert_eq!(json["configuration"]["lambdaDurationSeconds"], 900);
        assert_eq!(json["target"]["region"], "eu-west-1");
        assert_eq!(json["target"]["tableName"], "users");
        // Unused optional rule lists are not emitted
        assert!(json["source"].get("mapFields").is_none());
        assert!(json["source"].get("columnNames").is_none());
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut job = s3_job();
        job.source.map_fields = vec!["attrs".to_string()];
        let parsed = JobDescription::from_json(&job.to_json().unwrap()).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn test_local_location_round_trip() {
        let mut job = s3_job();
        job.source.location = SourceLocation::Local {
            path: PathBuf::from("/tmp/users.csv"),
        };
        let parsed = JobDescription::from_json(&job.to_json().unwrap()).unwrap();
        assert_eq!(parsed.source.location, job.source.location);
        assert!(parsed.require_s3_source().is_err());
    }

    #[test]
    fn test_schema_from_source_lists() {
        let schema = s3_job().schema().unwrap();
        assert_eq!(schema.kind_of("age"), FieldKind::Number);
        assert_eq!(schema.kind_of("active"), FieldKind::Boolean);
        assert_eq!(schema.kind_of("name"), FieldKind::String);
    }

    #[test]
    fn test_validate_requires_table() {
        let mut job = s3_job();
        job.target.table_name.clear();
        assert_eq!(job.validate(), Err(ConfigError::Missing("table name")));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut job = s3_job();
        job.configuration.concurrency = 0;
        assert!(matches!(
            job.validate(),
            Err(ConfigError::InvalidValue { name: "concurrency", .. })
        ));
    }

    #[test]
    fn test_validate_requires_complete_bucket_triple() {
        let mut job = s3_job();
        job.source.location = SourceLocation::S3 {
            region: "eu-west-2".to_string(),
            bucket: String::new(),
            key: "k".to_string(),
        };
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            s3_job().source.location.display_name(),
            "s3://data/imports/users.csv (eu-west-2)"
        );
    }
}
