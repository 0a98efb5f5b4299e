//! Writer pool draining the batch queue into a [`BatchSink`].

use crate::error::PipelineError;
use crate::progress::ProgressCounters;
use crate::queue::BatchReceiver;
use dynamo_sink::BatchSink;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Aggregate progress is logged each time the total batch count reaches a
/// multiple of this.
pub const PROGRESS_LOG_INTERVAL_BATCHES: u64 = 100;

/// Result of one writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub worker_index: usize,
    pub batches_written: u64,
    pub records_written: u64,
    /// Set when the writer stopped because of a failure.
    pub error: Option<String>,
}

impl WorkerOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of all writers after the pool has been joined.
#[derive(Debug, Clone)]
pub struct PoolReport {
    pub outcomes: Vec<WorkerOutcome>,
}

impl PoolReport {
    pub fn failures(&self) -> impl Iterator<Item = &WorkerOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// `Ok` when every writer drained the queue without error.
    pub fn into_result(self) -> Result<Vec<WorkerOutcome>, PipelineError> {
        let failed: Vec<&WorkerOutcome> = self.failures().collect();
        match failed.first() {
            None => Ok(self.outcomes),
            Some(first) => Err(PipelineError::WritersFailed {
                failed: failed.len(),
                total: self.outcomes.len(),
                worker_index: first.worker_index,
                first_error: first.error.clone().unwrap_or_default(),
            }),
        }
    }
}

/// Fixed set of writers started before production begins.
pub struct WriterPool {
    handles: Vec<(usize, JoinHandle<WorkerOutcome>)>,
}

impl WriterPool {
    /// Spawn `workers` writers sharing `receiver`.
    pub fn start<S>(
        sink: Arc<S>,
        receiver: BatchReceiver,
        workers: usize,
        counters: ProgressCounters,
    ) -> Self
    where
        S: BatchSink + 'static,
    {
        let handles = (0..workers)
            .map(|worker_index| {
                let handle = tokio::spawn(run_worker(
                    worker_index,
                    sink.clone(),
                    receiver.clone(),
                    counters.clone(),
                ));
                (worker_index, handle)
            })
            .collect();
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every writer to finish.
    pub async fn join(self) -> PoolReport {
        let mut outcomes = Vec::with_capacity(self.handles.len());
        for (worker_index, handle) in self.handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(worker = worker_index, "Writer task failed: {e}");
                    WorkerOutcome {
                        worker_index,
                        batches_written: 0,
                        records_written: 0,
                        error: Some(format!("writer task failed: {e}")),
                    }
                }
            };
            outcomes.push(outcome);
        }
        PoolReport { outcomes }
    }
}

async fn run_worker<S>(
    worker_index: usize,
    sink: Arc<S>,
    receiver: BatchReceiver,
    counters: ProgressCounters,
) -> WorkerOutcome
where
    S: BatchSink + 'static,
{
    let mut outcome = WorkerOutcome {
        worker_index,
        batches_written: 0,
        records_written: 0,
        error: None,
    };

    while let Some(batch) = receiver.recv().await {
        if let Err(e) = sink.write_batch(&batch).await {
            error!(worker = worker_index, "Failed to write batch: {e:#}");
            outcome.error = Some(format!("{e:#}"));
            // Dropping the receiver here lets the producer notice once every
            // writer has stopped
            return outcome;
        }

        outcome.batches_written += 1;
        outcome.records_written += batch.len() as u64;
        let totals = counters.record_batch(batch.len() as u64);

        if totals.batches % PROGRESS_LOG_INTERVAL_BATCHES == 0 {
            info!(
                worker = worker_index,
                records = totals.records,
                batches = totals.batches,
                rps = %format!("{:.0}", totals.records_per_second()),
                "progress"
            );
        }
    }

    debug!(
        worker = worker_index,
        batches = outcome.batches_written,
        records = outcome.records_written,
        "writer finished"
    );
    outcome
}
