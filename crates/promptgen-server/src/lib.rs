//! Prompt Generator Server
//!
//! HTTP surface, generation worker and infrastructure adapters around the
//! `promptgen` domain crate. The same router runs as a standalone server
//! and behind API Gateway as a Lambda function.

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod adapters;
pub mod application;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod models;
pub mod routes;
pub mod telemetry;

use application::PromptService;
use config::AuthMode;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub prompt_service: Arc<PromptService>,
    pub auth: Arc<AuthMode>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Prompt generator is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Browsers reject `*` together with credentials, so the origin is echoed back.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-amz-date"),
            AUTHORIZATION,
            HeaderName::from_static("x-amz-security-token"),
        ])
        .allow_methods([Method::OPTIONS, Method::POST, Method::GET, Method::DELETE])
}

pub fn build_router(state: AppState) -> Router {
    // Protected routes (require a caller identity)
    let protected_routes = Router::new()
        .merge(routes::prompt::router())
        .merge(routes::subscription::router())
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth::auth_middleware,
        ));

    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
