//! Standalone server
//!
//! Runs the HTTP surface on a local port. Without a state machine ARN the
//! generation worker runs in-process.

use anyhow::Context;

use promptgen_server::{bootstrap, build_router, config::Config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing(false);

    tracing::info!("✍️  Prompt generator initializing...");

    let config = Config::from_env().context("Invalid configuration")?;
    let state = bootstrap::build_state(&config)
        .await
        .context("Failed to initialize prompt store")?;
    let router = build_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("📚 Swagger UI: http://{}/swagger-ui", addr);
    tracing::info!("✅ Prompt generator ready on {}", addr);

    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}
