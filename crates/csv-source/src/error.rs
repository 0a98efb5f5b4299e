//! Error types for the CSV import pipeline.

use thiserror::Error;

/// Errors raised while reading and converting CSV rows.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// CSV error (I/O failure, invalid UTF-8, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row's field count differs from the header arity.
    #[error("Wrong number of fields on line {line}: expected {expected}, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The header row names the same column twice.
    #[error("Column '{0}' appears more than once in the header row")]
    DuplicateHeader(String),
}

/// Errors that end a local import run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source could not be read or a row could not be converted.
    #[error("Failed to read batch {batch} from input: {source}")]
    Read { batch: u64, source: ConvertError },

    /// Every writer exited while batches were still being produced.
    #[error("All writers stopped before the input was consumed")]
    WritersStopped,

    /// One or more writers failed; the import is incomplete.
    #[error("{failed} of {total} writers failed, worker {worker_index}: {first_error}")]
    WritersFailed {
        failed: usize,
        total: usize,
        worker_index: usize,
        first_error: String,
    },
}
