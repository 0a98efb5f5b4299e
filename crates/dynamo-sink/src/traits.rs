//! BatchSink trait definition.

use anyhow::Result;
use import_core::Item;

/// Trait for writing batches of converted items to the target store.
///
/// # Usage Pattern
///
/// The pipeline is generic over the sink, so writes are statically
/// dispatched:
///
/// ```ignore
/// pub async fn run_import<S: BatchSink + 'static>(
///     config: &ImportConfig,
///     sink: Arc<S>,
/// ) -> Result<ImportSummary> {
///     sink.write_batch(&batch).await?;
/// }
/// ```
///
/// # Contract
///
/// A call either persists the whole batch or returns an error. Partial
/// per-item failures are the implementation's concern: it must resolve them
/// (for example by resubmitting unprocessed items) or fail the call.
#[async_trait::async_trait]
pub trait BatchSink: Send + Sync {
    /// Write one batch of at most 25 items.
    async fn write_batch(&self, items: &[Item]) -> Result<()>;
}
