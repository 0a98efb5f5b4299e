use crate::BatchSink;
use anyhow::Result;
use import_core::Item;
use tracing::debug;

/// Sink that accepts every batch without writing it.
#[derive(Debug, Default, Clone)]
pub struct DryRunSink;

#[async_trait::async_trait]
impl BatchSink for DryRunSink {
    async fn write_batch(&self, items: &[Item]) -> Result<()> {
        debug!("Dry run: Would write batch of {} items", items.len());
        Ok(())
    }
}
