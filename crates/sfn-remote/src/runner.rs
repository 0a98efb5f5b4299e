//! Remote import run: discover the template, submit the job, poll to a
//! terminal status and aggregate the output.

use crate::error::RemoteError;
use crate::result::{parse_execution_output, RemoteSummary};
use crate::service::{ExecutionStatus, JobService, TemplateSummary};
use import_core::{ConfigError, JobDescription};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Name of the deployed state machine running imports.
pub const DEFAULT_TEMPLATE_NAME: &str = "ddbimport";

/// Delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a remote import run
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Job description submitted as the execution input
    pub job: JobDescription,

    /// Region of the job-execution service
    pub region: String,

    pub template_name: String,

    pub poll_interval: Duration,

    /// Give up waiting after this long; the execution keeps running
    pub timeout: Option<Duration>,
}

impl RemoteConfig {
    /// Remote config with default template and polling; the service region
    /// defaults to the table region.
    pub fn new(job: JobDescription) -> Self {
        let region = job.target.region.clone();
        Self {
            job,
            region,
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.job.validate()?;
        self.job.require_s3_source()?;
        if self.region.is_empty() {
            return Err(ConfigError::Missing("step function region"));
        }
        if self.template_name.is_empty() {
            return Err(ConfigError::Missing("state machine name"));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "poll interval",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Run a remote import and return the aggregated invocation results.
///
/// Cancelling `cancel` stops polling; the remote execution is left running.
pub async fn run_remote<J>(
    config: &RemoteConfig,
    service: &J,
    cancel: &CancellationToken,
) -> Result<RemoteSummary, RemoteError>
where
    J: JobService + ?Sized,
{
    config.validate()?;

    let template = find_template(service, &config.template_name).await?;
    info!(state_machine_arn = %template.arn, "found state machine");

    let input = config.job.to_json()?;
    let execution_name = Uuid::new_v4().to_string();
    let execution_arn = service
        .start_execution(&template.arn, &execution_name, &input)
        .await
        .map_err(|e| RemoteError::Submit(format!("{e:#}")))?;
    info!(execution_arn = %execution_arn, "started execution");

    let output = wait_for_completion(config, service, &execution_arn, cancel).await?;

    let results = parse_execution_output(&output).map_err(|e| RemoteError::InvalidOutput {
        execution_arn: execution_arn.clone(),
        message: e.to_string(),
    })?;
    let summary = RemoteSummary::from_results(&results);
    info!(
        execution_arn = %execution_arn,
        invocations = summary.invocations,
        processed_count = summary.processed_count,
        "complete"
    );
    Ok(summary)
}

/// Locate the single template named `name`.
pub async fn find_template<J>(service: &J, name: &str) -> Result<TemplateSummary, RemoteError>
where
    J: JobService + ?Sized,
{
    let mut matches: Vec<TemplateSummary> = service
        .list_templates()
        .await
        .map_err(|e| RemoteError::Discovery(format!("{e:#}")))?
        .into_iter()
        .filter(|t| t.name == name)
        .collect();

    match matches.len() {
        0 => Err(RemoteError::TemplateNotFound {
            name: name.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(RemoteError::AmbiguousTemplate {
            name: name.to_string(),
            arns: matches.into_iter().map(|t| t.arn).collect(),
        }),
    }
}

/// Poll until the execution leaves the running state. Returns the output of
/// a succeeded execution.
///
/// Cancellation and the timeout also interrupt a status request in flight.
async fn wait_for_completion<J>(
    config: &RemoteConfig,
    service: &J,
    execution_arn: &str,
    cancel: &CancellationToken,
) -> Result<String, RemoteError>
where
    J: JobService + ?Sized,
{
    // A timeout too large to represent as an instant means no deadline
    let deadline = config
        .timeout
        .and_then(|timeout| Instant::now().checked_add(timeout).map(|at| (at, timeout)));
    let expired = async {
        match deadline {
            Some((at, _)) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RemoteError::Cancelled {
            execution_arn: execution_arn.to_string(),
        }),
        _ = expired => Err(RemoteError::TimedOut {
            execution_arn: execution_arn.to_string(),
            timeout: deadline.map(|(_, timeout)| timeout).unwrap_or_default(),
        }),
        output = poll_status(service, execution_arn, config.poll_interval) => output,
    }
}

async fn poll_status<J>(
    service: &J,
    execution_arn: &str,
    poll_interval: Duration,
) -> Result<String, RemoteError>
where
    J: JobService + ?Sized,
{
    loop {
        let description = service
            .describe_execution(execution_arn)
            .await
            .map_err(|e| RemoteError::Status {
                execution_arn: execution_arn.to_string(),
                message: format!("{e:#}"),
            })?;

        match description.status {
            ExecutionStatus::Running => info!(execution_arn, "execution running"),
            ExecutionStatus::Succeeded => {
                info!(execution_arn, "execution succeeded");
                return Ok(description.output.unwrap_or_default());
            }
            status => {
                warn!(execution_arn, status = %status, "execution did not succeed");
                return Err(RemoteError::UnexpectedStatus {
                    execution_arn: execution_arn.to_string(),
                    status: status.to_string(),
                });
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}
