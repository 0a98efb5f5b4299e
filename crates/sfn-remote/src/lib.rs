//! Remote import execution
//!
//! Delegates a whole import to a deployed Step Functions state machine: the
//! job description is submitted as the execution input and the execution is
//! polled until it reaches a terminal status.

mod error;
mod result;
mod runner;
mod service;
mod step_functions;

pub use error::RemoteError;
pub use result::{parse_execution_output, InvocationResult, RemoteSummary};
pub use runner::{
    find_template, run_remote, RemoteConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TEMPLATE_NAME,
};
pub use service::{ExecutionDescription, ExecutionStatus, JobService, TemplateSummary};
pub use step_functions::StepFunctionsService;

// Re-export for callers wiring up Ctrl-C handling
pub use tokio_util::sync::CancellationToken;
