//! Local filesystem file reader implementation

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Reads a local file with configurable buffering
pub struct LocalFileReader;

impl LocalFileReader {
    /// Open a local file and return a buffered, sync-compatible reader
    ///
    /// The file is streamed, never read into memory as a whole.
    ///
    /// # Arguments
    /// * `path` - Path to the file
    /// * `buffer_size` - Size of the read buffer in bytes
    pub async fn open(path: PathBuf, buffer_size: usize) -> Result<Box<dyn std::io::Read + Send>> {
        let file = tokio::fs::File::open(&path)
            .await
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let file = file.into_std().await;
        tracing::debug!("Opened local file: {}", path.display());
        Ok(Box::new(std::io::BufReader::with_capacity(buffer_size, file)))
    }
}
