use import_core::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a remote import.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to list state machines: {0}")]
    Discovery(String),

    #[error("{name} state machine not found. Have you deployed the {name} Step Function?")]
    TemplateNotFound { name: String },

    #[error("Found {} state machines named {name}: {}", arns.len(), arns.join(", "))]
    AmbiguousTemplate { name: String, arns: Vec<String> },

    #[error("Failed to encode job description: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to start execution of state machine: {0}")]
    Submit(String),

    #[error("Failed to get execution status of {execution_arn}: {message}")]
    Status {
        execution_arn: String,
        message: String,
    },

    #[error("Unexpected execution status {status} for {execution_arn}")]
    UnexpectedStatus {
        execution_arn: String,
        status: String,
    },

    #[error("Execution {execution_arn} did not finish within {timeout:?}")]
    TimedOut {
        execution_arn: String,
        timeout: Duration,
    },

    #[error("Stopped waiting for execution {execution_arn}; it continues to run remotely")]
    Cancelled { execution_arn: String },

    #[error("Failed to parse output of execution {execution_arn}: {message}")]
    InvalidOutput {
        execution_arn: String,
        message: String,
    },
}
