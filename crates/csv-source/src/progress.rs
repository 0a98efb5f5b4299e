//! Progress counters, periodic progress logging and JSONL metrics emission.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tracing::info;

/// Counters shared by the producer and all writers of one import run.
#[derive(Clone)]
pub struct ProgressCounters {
    records: Arc<AtomicU64>,
    batches: Arc<AtomicU64>,
    conversion_fallbacks: Arc<AtomicU64>,
    start_time: Instant,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub records: u64,
    pub batches: u64,
    pub conversion_fallbacks: u64,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    pub fn records_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for ProgressCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCounters {
    pub fn new() -> Self {
        Self {
            records: Arc::new(AtomicU64::new(0)),
            batches: Arc::new(AtomicU64::new(0)),
            conversion_fallbacks: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Count one written batch of `records` items and return the totals
    /// including it.
    pub fn record_batch(&self, records: u64) -> ProgressSnapshot {
        let records = self.records.fetch_add(records, Ordering::Relaxed) + records;
        let batches = self.batches.fetch_add(1, Ordering::Relaxed) + 1;
        ProgressSnapshot {
            records,
            batches,
            conversion_fallbacks: self.conversion_fallbacks.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }

    pub fn add_conversion_fallbacks(&self, count: u64) {
        if count > 0 {
            self.conversion_fallbacks.fetch_add(count, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            records: self.records.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            conversion_fallbacks: self.conversion_fallbacks.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }
}

/// Logs aggregate progress at a fixed interval until aborted.
pub struct ProgressReporter;

impl ProgressReporter {
    pub fn start(counters: ProgressCounters, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            // The first tick completes immediately
            timer.tick().await;
            loop {
                timer.tick().await;
                let snapshot = counters.snapshot();
                info!(
                    records = snapshot.records,
                    batches = snapshot.batches,
                    rps = %format!("{:.0}", snapshot.records_per_second()),
                    "progress"
                );
            }
        })
    }
}

/// Single metrics entry (one JSON line)
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsEntry {
    pub timestamp: String,
    pub records_written: u64,
    pub batches_written: u64,
    pub conversion_fallbacks: u64,
    pub throughput_records_per_sec: f64,
    pub memory_mb: u64,
    pub elapsed_secs: f64,
}

impl From<ProgressSnapshot> for MetricsEntry {
    fn from(snapshot: ProgressSnapshot) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            records_written: snapshot.records,
            batches_written: snapshot.batches,
            conversion_fallbacks: snapshot.conversion_fallbacks,
            throughput_records_per_sec: snapshot.records_per_second(),
            memory_mb: process_memory_mb(),
            elapsed_secs: snapshot.elapsed.as_secs_f64(),
        }
    }
}

/// Appends a [`MetricsEntry`] per interval to a JSONL file.
pub struct MetricsEmitter {
    counters: ProgressCounters,
    output_path: PathBuf,
}

impl MetricsEmitter {
    pub fn new(output_path: PathBuf, counters: ProgressCounters) -> Self {
        Self {
            counters,
            output_path,
        }
    }

    /// Start background metrics emission task
    pub fn start(self, interval: Duration) -> JoinHandle<Result<()>> {
        tokio::spawn(async move {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.output_path)
                .await?;

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                let entry = MetricsEntry::from(self.counters.snapshot());
                let json_line = serde_json::to_string(&entry)?;
                file.write_all(json_line.as_bytes()).await?;
                file.write_all(b"\n").await?;
                file.flush().await?;
            }
        })
    }
}

/// Resident memory of this process from /proc/self/status; 0 elsewhere.
fn process_memory_mb() -> u64 {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|content| {
            content
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| {
                    line.split_whitespace()
                        .nth(1)
                        .and_then(|kb| kb.parse::<u64>().ok())
                        .map(|kb| kb / 1024)
                })
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_record_batch_returns_running_totals() {
        let counters = ProgressCounters::new();
        let first = counters.record_batch(25);
        assert_eq!(first.records, 25);
        assert_eq!(first.batches, 1);

        let clone = counters.clone();
        let second = clone.record_batch(5);
        assert_eq!(second.records, 30);
        assert_eq!(second.batches, 2);
        assert_eq!(counters.snapshot().records, 30);
    }

    #[test]
    fn test_conversion_fallbacks() {
        let counters = ProgressCounters::new();
        counters.add_conversion_fallbacks(0);
        counters.add_conversion_fallbacks(3);
        assert_eq!(counters.snapshot().conversion_fallbacks, 3);
    }

    #[test]
    fn test_records_per_second() {
        let snapshot = ProgressSnapshot {
            records: 500,
            batches: 20,
            conversion_fallbacks: 0,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(snapshot.records_per_second(), 250.0);

        let empty = ProgressSnapshot {
            elapsed: Duration::ZERO,
            ..snapshot
        };
        assert_eq!(empty.records_per_second(), 0.0);
    }

    #[tokio::test]
    async fn test_metrics_emission_writes_jsonl() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        let counters = ProgressCounters::new();
        counters.record_batch(25);
        counters.record_batch(10);

        let handle = MetricsEmitter::new(path.clone(), counters).start(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(70)).await;
        handle.abort();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(!lines.is_empty());

        let entry: MetricsEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry.records_written, 35);
        assert_eq!(entry.batches_written, 2);
    }
}
