//! Local import run
//!
//! Streams a CSV file from local disk or S3, converts each row to a DynamoDB
//! item and writes batches through a fixed pool of concurrent writers.

use crate::converter::Converter;
use crate::error::PipelineError;
use crate::pool::{WorkerOutcome, WriterPool};
use crate::progress::{MetricsEmitter, ProgressCounters, ProgressReporter};
use crate::queue::{batch_queue, BatchSender, DEFAULT_QUEUE_CAPACITY};
use anyhow::{Context, Result};
use ddbimport_file::{FileSource, DEFAULT_BUFFER_SIZE};
use dynamo_sink::BatchSink;
use import_core::{ConfigError, Delimiter, ImportSchema, JobDescription, MAX_BATCH_SIZE};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Default interval of the periodic progress log line.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Interval between two JSONL metrics entries.
const METRICS_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a local import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Source, conversion rules, writer count and target table
    pub job: JobDescription,

    /// Number of batches buffered between the reader and the writers
    pub queue_capacity: usize,

    /// Number of items per write request (at most 25)
    pub batch_size: usize,

    /// Read buffer size of the input stream
    pub buffer_size: usize,

    /// How often aggregate progress is logged
    pub progress_interval: Duration,

    /// Optional path to emit metrics during execution
    pub emit_metrics: Option<PathBuf>,
}

impl ImportConfig {
    pub fn new(job: JobDescription) -> Self {
        Self {
            job,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            batch_size: MAX_BATCH_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            emit_metrics: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.job.validate()?;
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                name: "queue capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::InvalidValue {
                name: "batch size",
                reason: format!("must be between 1 and {MAX_BATCH_SIZE}"),
            });
        }
        if self.progress_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "progress interval",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Totals of a finished local import.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub records: u64,
    pub batches: u64,
    pub conversion_fallbacks: u64,
    pub elapsed: Duration,
    pub workers: Vec<WorkerOutcome>,
}

impl ImportSummary {
    pub fn records_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

/// Run a local import into `sink`.
///
/// Returns an error when the input cannot be opened or read, when a row does
/// not match the header, or when any writer failed.
pub async fn run_import<S>(config: &ImportConfig, sink: Arc<S>) -> Result<ImportSummary>
where
    S: BatchSink + 'static,
{
    config.validate()?;
    let schema = config.job.schema()?;
    let source = FileSource::from(&config.job.source.location);
    let workers = config.job.configuration.concurrency;

    info!(
        input = %source.display_name(),
        table_region = %config.job.target.region,
        table_name = %config.job.target.table_name,
        workers,
        "starting local import"
    );

    let reader = source
        .open(config.buffer_size)
        .await
        .with_context(|| format!("Failed to open input {}", source.display_name()))?;

    let counters = ProgressCounters::new();
    let (sender, receiver) = batch_queue(config.queue_capacity);
    let pool = WriterPool::start(sink, receiver, workers, counters.clone());
    let reporter = ProgressReporter::start(counters.clone(), config.progress_interval);
    let metrics_task = config.emit_metrics.as_ref().map(|path| {
        info!("Emitting metrics to: {}", path.display());
        MetricsEmitter::new(path.clone(), counters.clone()).start(METRICS_INTERVAL)
    });

    let delimiter = config.job.source.delimiter;
    let batch_size = config.batch_size;
    let producer_counters = counters.clone();
    let produced = tokio::task::spawn_blocking(move || {
        produce(reader, delimiter, schema, batch_size, sender, &producer_counters)
    })
    .await;

    let report = pool.join().await;
    reporter.abort();
    if let Some(task) = metrics_task {
        task.abort();
    }

    let snapshot = counters.snapshot();
    let summary = ImportSummary {
        records: snapshot.records,
        batches: snapshot.batches,
        conversion_fallbacks: snapshot.conversion_fallbacks,
        elapsed: snapshot.elapsed,
        workers: report.outcomes.clone(),
    };
    info!(
        records = summary.records,
        batches = summary.batches,
        conversion_fallbacks = summary.conversion_fallbacks,
        rps = %format!("{:.0}", summary.records_per_second()),
        duration = ?summary.elapsed,
        "complete"
    );

    let produced = produced.context("Ingestion task panicked")?;
    match produced {
        // Writers stopping early is reported through their own errors
        Err(PipelineError::WritersStopped) if !report.is_success() => {}
        Err(e) => {
            error!("Import aborted: {e}");
            return Err(e.into());
        }
        Ok(_) => {}
    }
    report.into_result()?;
    Ok(summary)
}

/// Read batches from `reader` and enqueue them until the input is exhausted.
///
/// Runs on a blocking thread. Returns the number of batches enqueued. The
/// sender is dropped on every return path, so the writers always see the
/// queue close.
fn produce<R: Read>(
    reader: R,
    delimiter: Delimiter,
    schema: ImportSchema,
    batch_size: usize,
    sender: BatchSender,
    counters: &ProgressCounters,
) -> Result<u64, PipelineError> {
    let mut converter = Converter::new(reader, delimiter, schema)
        .map_err(|source| PipelineError::Read { batch: 0, source })?;

    let mut batches = 0u64;
    loop {
        let batch = converter
            .read_batch(batch_size)
            .map_err(|source| PipelineError::Read {
                batch: batches,
                source,
            })?;
        counters.add_conversion_fallbacks(converter.take_conversion_fallbacks());

        let end_of_input = batch.end_of_input;
        if !batch.is_empty() {
            sender
                .send_blocking(batch.items)
                .map_err(|_| PipelineError::WritersStopped)?;
            batches += 1;
        }
        if end_of_input {
            break;
        }
    }

    sender.close();
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_core::{JobConfiguration, JobSource, JobTarget, SourceLocation};

    fn job() -> JobDescription {
        JobDescription {
            source: JobSource::new(SourceLocation::Local {
                path: PathBuf::from("data.csv"),
            }),
            configuration: JobConfiguration::default(),
            target: JobTarget {
                region: "eu-west-2".to_string(),
                table_name: "ddbimport".to_string(),
            },
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ImportConfig::new(job());
        assert_eq!(config.queue_capacity, 128);
        assert_eq!(config.batch_size, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_batch_size_limit() {
        let mut config = ImportConfig::new(job());
        config.batch_size = 26;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                name: "batch size",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_queue_capacity() {
        let mut config = ImportConfig::new(job());
        config.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_produce_skips_empty_final_batch() {
        let (sender, receiver) = batch_queue(8);
        let counters = ProgressCounters::new();
        let input = "id\n1\n2\n3\n4";
        let schema = ImportSchema::builder().build().unwrap();

        let batches =
            produce(input.as_bytes(), Delimiter::Comma, schema, 2, sender, &counters).unwrap();
        assert_eq!(batches, 2);

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            assert_eq!(receiver.recv().await.unwrap().len(), 2);
            assert_eq!(receiver.recv().await.unwrap().len(), 2);
            assert!(receiver.recv().await.is_none());
        });
    }

    #[test]
    fn test_produce_reports_failing_batch() {
        let (sender, _receiver) = batch_queue(8);
        let counters = ProgressCounters::new();
        let input = "a,b\n1,2\n3,4\n5";
        let schema = ImportSchema::builder().build().unwrap();

        let err =
            produce(input.as_bytes(), Delimiter::Comma, schema, 2, sender, &counters).unwrap_err();
        assert!(matches!(err, PipelineError::Read { batch: 1, .. }));
    }

    #[test]
    fn test_produce_stops_when_writers_are_gone() {
        let (sender, receiver) = batch_queue(1);
        drop(receiver);
        let counters = ProgressCounters::new();
        let input = "id\n1";
        let schema = ImportSchema::builder().build().unwrap();

        let err =
            produce(input.as_bytes(), Delimiter::Comma, schema, 25, sender, &counters).unwrap_err();
        assert!(matches!(err, PipelineError::WritersStopped));
    }
}
