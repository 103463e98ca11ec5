//! Step Functions Workflow
//!
//! Starts an execution of the single-step generation state machine.
//! The state machine itself is declared by the deployment.

use async_trait::async_trait;
use aws_sdk_sfn::error::DisplayErrorContext;
use aws_sdk_sfn::Client;
use uuid::Uuid;

use promptgen::{DomainError, GenerationRequest, WorkflowStarter};

/// Execution names are limited to 80 characters
const MAX_EXECUTION_NAME: usize = 80;

pub struct StepFunctionsWorkflow {
    client: Client,
    state_machine_arn: String,
}

impl StepFunctionsWorkflow {
    pub fn new(client: Client, state_machine_arn: impl Into<String>) -> Self {
        Self {
            client,
            state_machine_arn: state_machine_arn.into(),
        }
    }

    pub async fn from_env(state_machine_arn: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), state_machine_arn)
    }
}

/// Unique, valid execution name that still shows which record it serves
pub fn execution_name(prompt_id: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let budget = MAX_EXECUTION_NAME - suffix.len() - 1;
    let prefix: String = prompt_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .take(budget)
        .collect();

    if prefix.is_empty() {
        suffix
    } else {
        format!("{}-{}", prefix, suffix)
    }
}

#[async_trait]
impl WorkflowStarter for StepFunctionsWorkflow {
    async fn start(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        let input = serde_json::to_string(request)
            .map_err(|e| DomainError::ExternalService(format!("Failed to encode input: {e}")))?;

        let output = self
            .client
            .start_execution()
            .state_machine_arn(&self.state_machine_arn)
            .name(execution_name(&request.prompt_id))
            .input(input)
            .send()
            .await
            .map_err(|e| {
                DomainError::ExternalService(format!(
                    "StartExecution failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(output.execution_arn().to_string())
    }

    fn orchestrator_name(&self) -> &str {
        "step-functions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_name_keeps_prompt_id() {
        let name = execution_name("3f2c0d9e-1b4a-4c7e-9f00-0a1b2c3d4e5f");
        assert!(name.starts_with("3f2c0d9e-1b4a-4c7e-9f00-0a1b2c3d4e5f-"));
        assert!(name.len() <= MAX_EXECUTION_NAME);
    }

    #[test]
    fn test_execution_name_sanitizes_and_truncates() {
        let name = execution_name(&"a b/c".repeat(40));
        assert!(name.len() <= MAX_EXECUTION_NAME);
        assert!(name.starts_with("a-b-c"));
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_execution_names_are_unique() {
        assert_ne!(execution_name("p1"), execution_name("p1"));
    }
}
