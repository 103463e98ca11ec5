//! Request handler Lambda
//!
//! Serves the HTTP router behind API Gateway.

use anyhow::Context;

use promptgen_server::{bootstrap, build_router, config::Config, telemetry};

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    telemetry::init_tracing(true);

    let config = Config::from_env().context("Invalid configuration")?;
    config
        .require_deployed_backends()
        .context("The request handler function needs AppSync and Step Functions")?;
    let state = bootstrap::build_state(&config)
        .await
        .context("Failed to initialize prompt store")?;

    tracing::info!("Request handler ready (auth mode {})", config.auth.name());

    lambda_http::run(build_router(state)).await
}
