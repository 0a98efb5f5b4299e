//! AWS Step Functions implementation of [`JobService`].

use crate::service::{ExecutionDescription, ExecutionStatus, JobService, TemplateSummary};
use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_sfn::config::Region;
use aws_sdk_sfn::types::ExecutionStatus as SfnExecutionStatus;

/// Page size used when listing state machines
const LIST_PAGE_SIZE: i32 = 1000;

#[derive(Clone)]
pub struct StepFunctionsService {
    client: aws_sdk_sfn::Client,
}

impl StepFunctionsService {
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::from_client(aws_sdk_sfn::Client::new(&sdk_config))
    }

    pub fn from_client(client: aws_sdk_sfn::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl JobService for StepFunctionsService {
    async fn list_templates(&self) -> Result<Vec<TemplateSummary>> {
        let mut pages = self
            .client
            .list_state_machines()
            .max_results(LIST_PAGE_SIZE)
            .into_paginator()
            .items()
            .send();

        let mut templates = Vec::new();
        while let Some(state_machine) = pages.next().await {
            let state_machine = state_machine.context("ListStateMachines failed")?;
            templates.push(TemplateSummary {
                name: state_machine.name().to_string(),
                arn: state_machine.state_machine_arn().to_string(),
            });
        }
        Ok(templates)
    }

    async fn start_execution(&self, template_arn: &str, name: &str, input: &str) -> Result<String> {
        let output = self
            .client
            .start_execution()
            .state_machine_arn(template_arn)
            .name(name)
            .input(input)
            .send()
            .await
            .context("StartExecution failed")?;
        Ok(output.execution_arn().to_string())
    }

    async fn describe_execution(&self, execution_arn: &str) -> Result<ExecutionDescription> {
        let output = self
            .client
            .describe_execution()
            .execution_arn(execution_arn)
            .send()
            .await
            .context("DescribeExecution failed")?;
        Ok(ExecutionDescription {
            status: convert_status(output.status()),
            output: output.output().map(str::to_string),
        })
    }
}

fn convert_status(status: &SfnExecutionStatus) -> ExecutionStatus {
    match status {
        SfnExecutionStatus::Running => ExecutionStatus::Running,
        SfnExecutionStatus::Succeeded => ExecutionStatus::Succeeded,
        SfnExecutionStatus::Failed => ExecutionStatus::Failed,
        SfnExecutionStatus::TimedOut => ExecutionStatus::TimedOut,
        SfnExecutionStatus::Aborted => ExecutionStatus::Aborted,
        other => ExecutionStatus::Other(other.as_str().to_string()),
    }
}
