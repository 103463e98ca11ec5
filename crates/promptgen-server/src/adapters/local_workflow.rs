//! In-process Workflow
//!
//! Runs the generation step on a background task for local development,
//! bounded by the same overall timeout as the deployed state machine.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use promptgen::{DomainError, GenerationRequest, WorkflowStarter};

use crate::application::PromptGenerator;

pub struct LocalWorkflow {
    generator: Arc<PromptGenerator>,
    timeout: Duration,
}

impl LocalWorkflow {
    pub fn new(generator: Arc<PromptGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }
}

#[async_trait]
impl WorkflowStarter for LocalWorkflow {
    async fn start(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        let execution_id = format!("local:{}", Uuid::new_v4());
        let generator = self.generator.clone();
        let timeout = self.timeout;
        let request = request.clone();
        let execution = execution_id.clone();

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, generator.handle(&request)).await {
                Ok(outcome) => tracing::info!(
                    execution = %execution,
                    "Execution finished with {}",
                    outcome.status
                ),
                // The record keeps whatever status it had reached.
                Err(_) => tracing::error!(
                    execution = %execution,
                    prompt_id = %request.prompt_id,
                    "Execution timed out after {:?}",
                    timeout
                ),
            }
        });

        Ok(execution_id)
    }

    fn orchestrator_name(&self) -> &str {
        "local"
    }
}
