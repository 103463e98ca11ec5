//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories, the model and the workflow.

pub(crate) mod generator_service;
pub(crate) mod prompt_service;

pub use generator_service::PromptGenerator;
pub use prompt_service::{PromptService, SubmitError};
