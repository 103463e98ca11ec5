//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }
}

/// Failures of the prompt generation pipeline
///
/// Every variant collapses into the same outcome (record marked `ERROR`);
/// the variants only exist so the log line says what went wrong.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid or empty content array")]
    EmptyContent,

    #[error("No valid text content found in the response")]
    NoTextContent,

    #[error("No Instructions tags found in the response")]
    MissingInstructions,

    #[error("Store update failed: {0}")]
    Store(#[source] DomainError),

    #[error("Model invocation failed: {0}")]
    Model(#[source] DomainError),
}
