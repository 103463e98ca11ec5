//! Component wiring from [`Config`]
//!
//! Picks the AppSync or in-memory store and the Step Functions or
//! in-process workflow depending on what the environment provides.

use std::sync::Arc;

use promptgen::{DomainError, PromptRepository, WorkflowStarter};

use crate::adapters::{
    AppSyncPromptRepository, BedrockModelProvider, InMemoryPromptRepository, LocalWorkflow,
    StepFunctionsWorkflow,
};
use crate::application::{PromptGenerator, PromptService};
use crate::config::Config;
use crate::AppState;

pub fn build_repository(config: &Config) -> Result<Arc<dyn PromptRepository>, DomainError> {
    match &config.appsync {
        Some(appsync) => {
            tracing::info!("🗄️  Prompt store: AppSync ({})", appsync.endpoint);
            Ok(Arc::new(AppSyncPromptRepository::new(appsync)?))
        }
        None => {
            tracing::warn!("⚠️  No APPSYNC_ENDPOINT set - using in-memory store");
            Ok(Arc::new(InMemoryPromptRepository::new()))
        }
    }
}

pub async fn build_generator(
    config: &Config,
    repo: Arc<dyn PromptRepository>,
) -> Arc<PromptGenerator> {
    let model = BedrockModelProvider::from_region(&config.bedrock_region, &config.model_id).await;
    tracing::info!(
        "🤖 Model: {} ({})",
        config.model_id,
        config.bedrock_region
    );
    Arc::new(PromptGenerator::new(repo, Arc::new(model)))
}

pub async fn build_workflow(
    config: &Config,
    repo: Arc<dyn PromptRepository>,
) -> Arc<dyn WorkflowStarter> {
    match &config.state_machine_arn {
        Some(arn) => {
            tracing::info!("🔁 Workflow: Step Functions ({})", arn);
            Arc::new(StepFunctionsWorkflow::from_env(arn.clone()).await)
        }
        None => {
            tracing::warn!(
                "⚠️  No PROMPT_GENERATION_STATE_MACHINE_ARN set - running generation in-process ({:?} timeout)",
                config.workflow_timeout
            );
            let generator = build_generator(config, repo).await;
            Arc::new(LocalWorkflow::new(generator, config.workflow_timeout))
        }
    }
}

/// Everything the HTTP surface needs
pub async fn build_state(config: &Config) -> Result<AppState, DomainError> {
    let repo = build_repository(config)?;
    let workflow = build_workflow(config, repo.clone()).await;

    match &config.auth {
        crate::config::AuthMode::Disabled => {
            tracing::warn!("⚠️  Authentication disabled - every caller is anonymous")
        }
        mode => tracing::info!("🔐 Authentication mode: {}", mode.name()),
    }

    Ok(AppState {
        prompt_service: Arc::new(PromptService::new(repo, workflow)),
        auth: Arc::new(config.auth.clone()),
    })
}
