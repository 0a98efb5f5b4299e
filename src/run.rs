//! Execution of an [`ImportPlan`].

use crate::config::ImportPlan;
use anyhow::{Context, Result};
use csv_source::{run_import, ImportConfig, ImportSummary};
use dynamo_sink::{DryRunSink, DynamoBatchWriter};
use sfn_remote::{run_remote, CancellationToken, RemoteConfig, RemoteSummary, StepFunctionsService};
use std::sync::Arc;
use tracing::info;

/// Outcome of a finished import.
#[derive(Debug, Clone)]
pub enum ImportOutcome {
    Local(ImportSummary),
    Remote(RemoteSummary),
}

/// Run the plan to completion. `cancel` only affects remote polling.
pub async fn execute(plan: ImportPlan, cancel: CancellationToken) -> Result<ImportOutcome> {
    match plan {
        ImportPlan::Local { config, dry_run } => {
            run_local(&config, dry_run).await.map(ImportOutcome::Local)
        }
        ImportPlan::Remote(config) => run_remote_import(&config, &cancel)
            .await
            .map(ImportOutcome::Remote),
    }
}

/// Import a local or S3 file with in-process writers.
pub async fn run_local(config: &ImportConfig, dry_run: bool) -> Result<ImportSummary> {
    if dry_run {
        info!("Dry run: items are converted but not written");
        return run_import(config, Arc::new(DryRunSink)).await;
    }

    let target = &config.job.target;
    let writer = DynamoBatchWriter::new(&target.region, &target.table_name)
        .await
        .context("Failed to create DynamoDB client")?;
    run_import(config, Arc::new(writer)).await
}

/// Hand the import to the deployed Step Function and wait for it.
pub async fn run_remote_import(
    config: &RemoteConfig,
    cancel: &CancellationToken,
) -> Result<RemoteSummary> {
    info!(
        step_fn_region = %config.region,
        table_name = %config.job.target.table_name,
        input = %config.job.source.location.display_name(),
        "starting remote import"
    );
    let service = StepFunctionsService::new(&config.region).await;
    let summary = run_remote(config, &service, cancel).await?;
    Ok(summary)
}
