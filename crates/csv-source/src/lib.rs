//! CSV import pipeline for DynamoDB
//!
//! Streams a CSV file from local disk or S3, converts rows to DynamoDB items
//! and writes them in batches of up to 25 through a pool of concurrent
//! writers connected by a bounded queue.

mod converter;
mod error;
mod pool;
mod progress;
mod queue;
mod sync;

pub use converter::{Converter, ReadBatch};
pub use error::{ConvertError, PipelineError};
pub use pool::{PoolReport, WorkerOutcome, WriterPool, PROGRESS_LOG_INTERVAL_BATCHES};
pub use progress::{
    MetricsEmitter, MetricsEntry, ProgressCounters, ProgressReporter, ProgressSnapshot,
};
pub use queue::{batch_queue, BatchReceiver, BatchSender, QueueClosed, DEFAULT_QUEUE_CAPACITY};
pub use sync::{run_import, ImportConfig, ImportSummary, DEFAULT_PROGRESS_INTERVAL};

// Re-export file source types for convenience
pub use ddbimport_file::{FileSource, DEFAULT_BUFFER_SIZE};
