//! JobService trait definition.

use anyhow::Result;
use std::fmt;

/// A deployed job template (state machine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub arn: String,
}

/// Status of a submitted execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Aborted,
    Other(String),
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::TimedOut => "TIMED_OUT",
            ExecutionStatus::Aborted => "ABORTED",
            ExecutionStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionDescription {
    pub status: ExecutionStatus,
    /// Present once the execution succeeded
    pub output: Option<String>,
}

/// Remote job-execution service.
///
/// Implementations talk to the real service; tests substitute a scripted
/// fake. Errors are opaque to the caller, which reports them with context.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// List every deployed template.
    async fn list_templates(&self) -> Result<Vec<TemplateSummary>>;

    /// Start an execution of `template_arn` and return the execution ARN.
    async fn start_execution(&self, template_arn: &str, name: &str, input: &str) -> Result<String>;

    async fn describe_execution(&self, execution_arn: &str) -> Result<ExecutionDescription>;
}
