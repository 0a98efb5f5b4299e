//! S3 file reader implementation

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;

/// Reads an object from S3 with configurable buffering
pub struct S3FileReader;

impl S3FileReader {
    /// Open an S3 object and return a buffered, sync-compatible reader
    ///
    /// # Arguments
    /// * `region` - Region of the bucket
    /// * `bucket` - S3 bucket name
    /// * `key` - S3 object key
    /// * `buffer_size` - Size of the buffer in bytes (e.g., 1MB = 1024 * 1024)
    ///
    /// The returned reader bridges the async body stream; it must be read
    /// from a blocking thread, not from an async task.
    pub async fn open(
        region: String,
        bucket: String,
        key: String,
        buffer_size: usize,
    ) -> Result<Box<dyn std::io::Read + Send>> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;
        let client = aws_sdk_s3::Client::new(&sdk_config);

        let response = client
            .get_object()
            .bucket(&bucket)
            .key(&key)
            .send()
            .await
            .with_context(|| {
                format!("Failed to fetch object from S3: s3://{bucket}/{key} ({region})")
            })?;

        // Convert byte stream to async read
        let stream = response.body.into_async_read();

        // Wrap in buffered reader
        let buffered = tokio::io::BufReader::with_capacity(buffer_size, stream);

        // Bridge async to sync
        let reader = tokio_util::io::SyncIoBridge::new(buffered);

        Ok(Box::new(reader))
    }
}
