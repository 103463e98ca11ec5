//! Prompt generator Lambda
//!
//! The single task of the generation state machine. The execution input is
//! the `GenerationRequest`; the returned outcome becomes the task output.

use anyhow::Context;
use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;

use promptgen::{GenerationOutcome, GenerationRequest};
use promptgen_server::{application::PromptGenerator, bootstrap, config::Config, telemetry};

async fn handle(
    generator: &PromptGenerator,
    event: LambdaEvent<GenerationRequest>,
) -> Result<GenerationOutcome, lambda_runtime::Error> {
    let (request, context) = event.into_parts();
    tracing::info!(
        request_id = %context.request_id,
        prompt_id = %request.prompt_id,
        "Generating prompt"
    );
    Ok(generator.handle(&request).await)
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    telemetry::init_tracing(true);

    let config = Config::from_env().context("Invalid configuration")?;
    if config.appsync.is_none() {
        return Err("APPSYNC_ENDPOINT is required for the generator function".into());
    }
    let repo = bootstrap::build_repository(&config).context("Failed to initialize prompt store")?;
    let generator: Arc<PromptGenerator> = bootstrap::build_generator(&config, repo).await;

    lambda_runtime::run(service_fn(|event| {
        let generator = generator.clone();
        async move { handle(&generator, event).await }
    }))
    .await
}
