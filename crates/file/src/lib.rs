//! File source abstraction for reading CSV input from the local filesystem or S3
//!
//! Both source kinds are opened as a buffered, synchronous [`std::io::Read`]
//! so the CSV parser can stream them without loading the whole file.
//!
//! # Source Types
//!
//! - **Local**: A file on the local filesystem
//! - **S3**: An object in an S3 bucket in a given region
//!
//! # Example
//!
//! ```ignore
//! use ddbimport_file::{FileSource, DEFAULT_BUFFER_SIZE};
//!
//! let source = FileSource::Local("users.csv".into());
//! let reader = source.open(DEFAULT_BUFFER_SIZE).await?;
//! // Read from a blocking thread...
//! ```

mod local;
mod s3;

use anyhow::Result;
use import_core::SourceLocation;
use std::path::PathBuf;

pub use local::LocalFileReader;
pub use s3::S3FileReader;

/// Default buffer size for reading operations (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// A single CSV file location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Local filesystem path
    Local(PathBuf),
    /// S3 object
    S3 {
        region: String,
        bucket: String,
        key: String,
    },
}

impl FileSource {
    /// Open this source and return a reader
    ///
    /// S3 readers bridge an async body stream, so reads must happen on a
    /// blocking thread (for example inside `tokio::task::spawn_blocking`).
    pub async fn open(&self, buffer_size: usize) -> Result<Box<dyn std::io::Read + Send>> {
        match self {
            FileSource::Local(path) => LocalFileReader::open(path.clone(), buffer_size).await,
            FileSource::S3 {
                region,
                bucket,
                key,
            } => S3FileReader::open(region.clone(), bucket.clone(), key.clone(), buffer_size).await,
        }
    }

    /// Get a display name for logging
    pub fn display_name(&self) -> String {
        match self {
            FileSource::Local(path) => path.display().to_string(),
            FileSource::S3 {
                region,
                bucket,
                key,
            } => format!("s3://{bucket}/{key} ({region})"),
        }
    }
}

impl From<&SourceLocation> for FileSource {
    fn from(location: &SourceLocation) -> Self {
        match location {
            SourceLocation::Local { path } => FileSource::Local(path.clone()),
            SourceLocation::S3 {
                region,
                bucket,
                key,
            } => FileSource::S3 {
                region: region.clone(),
                bucket: bucket.clone(),
                key: key.clone(),
            },
        }
    }
}
