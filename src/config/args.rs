//! CLI argument definitions for an import.

use clap::Args;
use std::path::PathBuf;

/// Import arguments shared by local and remote execution.
#[derive(Args, Clone, Debug)]
pub struct ImportArgs {
    /// The AWS region where the DynamoDB table is located
    #[arg(long, env = "DDBIMPORT_TABLE_REGION")]
    pub table_region: Option<String>,

    /// The DynamoDB table name to import to
    #[arg(long, env = "DDBIMPORT_TABLE_NAME")]
    pub table_name: Option<String>,

    /// The AWS region where the source bucket is located
    #[arg(long)]
    pub bucket_region: Option<String>,

    /// The name of the S3 bucket containing the data file
    #[arg(long)]
    pub bucket_name: Option<String>,

    /// The file within the S3 bucket that contains the data
    #[arg(long)]
    pub bucket_key: Option<String>,

    /// The local CSV file to import. Pass this OR the bucket region, name and key
    #[arg(long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Carry out the import using the ddbimport Step Function
    #[arg(long)]
    pub remote: bool,

    /// The AWS region where the Step Function is installed (default: table region)
    #[arg(long)]
    pub step_fn_region: Option<String>,

    /// Comma separated list of numeric columns
    #[arg(long, default_value = "")]
    pub numeric_fields: String,

    /// Comma separated list of boolean columns
    #[arg(long, default_value = "")]
    pub boolean_fields: String,

    /// Comma separated list of columns holding DynamoDB JSON maps
    #[arg(long, default_value = "")]
    pub map_fields: String,

    /// Comma separated list of base64 encoded binary columns
    #[arg(long, default_value = "")]
    pub binary_fields: String,

    /// Comma separated column names; the first row is then read as data
    #[arg(long, default_value = "")]
    pub column_names: String,

    /// Comma separated list of columns to import; other columns are dropped
    #[arg(long, default_value = "")]
    pub key_columns: String,

    /// The delimiter of the CSV file. Use 'tab' or 'comma'
    #[arg(long, default_value = "comma")]
    pub delimiter: String,

    /// Number of imports to execute in parallel
    #[arg(long, default_value_t = import_core::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Number of batches buffered between the reader and the writers
    #[arg(long, default_value_t = csv_source::DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// How often to log progress (e.g. "10s", "1m")
    #[arg(long, default_value = "10s")]
    pub progress_interval: String,

    /// Emit metrics to the specified file during execution
    #[arg(long, value_name = "PATH")]
    pub emit_metrics: Option<PathBuf>,

    /// Read and convert the input without writing to DynamoDB
    #[arg(long)]
    pub dry_run: bool,

    /// Interval between status checks of a remote execution
    #[arg(long, default_value = "5s")]
    pub poll_interval: String,

    /// Stop waiting for a remote execution after this long
    #[arg(long)]
    pub remote_timeout: Option<String>,
}
