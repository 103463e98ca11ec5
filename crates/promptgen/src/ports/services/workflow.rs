//! Workflow Port
//!
//! Starts one single-step generation workflow execution per request.
//! Starting is fire-and-forget: the caller never waits for the worker.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, GenerationRequest};

/// Workflow starter interface
#[async_trait]
pub trait WorkflowStarter: Send + Sync {
    /// Start an execution with `request` as its input; returns the execution id
    async fn start(&self, request: &GenerationRequest) -> Result<String, DomainError>;

    /// Name of the orchestrator, for logs
    fn orchestrator_name(&self) -> &str;
}
