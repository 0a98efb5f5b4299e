//! Conversion of parsed CLI arguments into a validated import plan.

use super::args::ImportArgs;
use super::duration::parse_duration;
use csv_source::ImportConfig;
use import_core::{
    ConfigError, Delimiter, JobConfiguration, JobDescription, JobSource, JobTarget,
    SourceLocation, DEFAULT_INVOCATION_DURATION_SECS,
};
use sfn_remote::RemoteConfig;

/// What to run, fully validated.
#[derive(Debug, Clone)]
pub enum ImportPlan {
    Local { config: ImportConfig, dry_run: bool },
    Remote(RemoteConfig),
}

impl ImportPlan {
    pub fn job(&self) -> &JobDescription {
        match self {
            ImportPlan::Local { config, .. } => &config.job,
            ImportPlan::Remote(config) => &config.job,
        }
    }
}

impl ImportArgs {
    /// Validate the arguments and build the plan. Nothing is opened or
    /// contacted here.
    pub fn into_plan(self) -> Result<ImportPlan, ConfigError> {
        let table_region = non_empty(self.table_region);
        let table_name = non_empty(self.table_name);
        let (Some(table_region), Some(table_name)) = (table_region, table_name) else {
            return Err(ConfigError::Missing("table region and table name"));
        };

        let location = source_location(
            self.input_file,
            non_empty(self.bucket_region),
            non_empty(self.bucket_name),
            non_empty(self.bucket_key),
        )?;

        let mut source = JobSource::new(location);
        source.numeric_fields = split_list(&self.numeric_fields);
        source.boolean_fields = split_list(&self.boolean_fields);
        source.map_fields = split_list(&self.map_fields);
        source.binary_fields = split_list(&self.binary_fields);
        source.column_names = split_list(&self.column_names);
        source.key_columns = split_list(&self.key_columns);
        source.delimiter = Delimiter::parse_lenient(&self.delimiter);

        let job = JobDescription {
            source,
            configuration: JobConfiguration {
                concurrency: self.concurrency,
                invocation_duration_secs: DEFAULT_INVOCATION_DURATION_SECS,
            },
            target: JobTarget {
                region: table_region,
                table_name,
            },
        };

        if self.remote {
            if self.dry_run {
                return Err(ConfigError::Conflict(
                    "--dry-run applies to local imports only".to_string(),
                ));
            }
            if self.emit_metrics.is_some() {
                return Err(ConfigError::Conflict(
                    "--emit-metrics applies to local imports only".to_string(),
                ));
            }

            let mut config = RemoteConfig::new(job);
            if let Some(region) = non_empty(self.step_fn_region) {
                config.region = region;
            }
            config.poll_interval = duration_arg("poll interval", &self.poll_interval)?;
            config.timeout = self
                .remote_timeout
                .as_deref()
                .map(|timeout| duration_arg("remote timeout", timeout))
                .transpose()?;
            config.validate()?;
            return Ok(ImportPlan::Remote(config));
        }

        let mut config = ImportConfig::new(job);
        config.queue_capacity = self.queue_capacity;
        config.progress_interval = duration_arg("progress interval", &self.progress_interval)?;
        config.emit_metrics = self.emit_metrics;
        config.validate()?;
        Ok(ImportPlan::Local {
            config,
            dry_run: self.dry_run,
        })
    }
}

/// A local path, or all three of bucket region, name and key.
fn source_location(
    input_file: Option<std::path::PathBuf>,
    bucket_region: Option<String>,
    bucket_name: Option<String>,
    bucket_key: Option<String>,
) -> Result<SourceLocation, ConfigError> {
    let input_file = input_file.filter(|path| !path.as_os_str().is_empty());
    let any_bucket = bucket_region.is_some() || bucket_name.is_some() || bucket_key.is_some();

    match (input_file, any_bucket) {
        (Some(_), true) => Err(ConfigError::Conflict(
            "pass the input file OR the bucket region, bucket name and bucket key".to_string(),
        )),
        (Some(path), false) => Ok(SourceLocation::Local { path }),
        (None, true) => match (bucket_region, bucket_name, bucket_key) {
            (Some(region), Some(bucket), Some(key)) => Ok(SourceLocation::S3 {
                region,
                bucket,
                key,
            }),
            _ => Err(ConfigError::Missing(
                "all of bucket region, bucket name and bucket key",
            )),
        },
        (None, false) => Err(ConfigError::Missing(
            "input file, or bucket region, bucket name and bucket key",
        )),
    }
}

/// Split a comma separated list, dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn duration_arg(name: &'static str, value: &str) -> Result<std::time::Duration, ConfigError> {
    parse_duration(value).map_err(|e| ConfigError::InvalidValue {
        name,
        reason: format!("{e:#}"),
    })
}
