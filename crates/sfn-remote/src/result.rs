//! Execution output of a remote import.

use serde::{Deserialize, Serialize};

/// Result reported by one remote invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub processed_count: u64,
    pub duration_ms: u64,
}

/// Totals across all invocations of one execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteSummary {
    pub invocations: usize,
    pub processed_count: u64,
    /// Sum of invocation durations; invocations overlap, so this exceeds
    /// wall-clock time
    pub total_duration_ms: u64,
}

impl RemoteSummary {
    pub fn from_results(results: &[InvocationResult]) -> Self {
        results.iter().fold(
            Self {
                invocations: results.len(),
                ..Self::default()
            },
            |mut acc, r| {
                acc.processed_count += r.processed_count;
                acc.total_duration_ms += r.duration_ms;
                acc
            },
        )
    }
}

/// Parse execution output: a JSON array of invocation results.
pub fn parse_execution_output(output: &str) -> Result<Vec<InvocationResult>, serde_json::Error> {
    serde_json::from_str(output)
}
