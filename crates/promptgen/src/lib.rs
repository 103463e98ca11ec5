//! Prompt Generator Domain Library
//!
//! Core domain types and interfaces for the prompt generator.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (PromptRecord, GenerationRequest)
//!   - `value_objects/`: Immutable value types (PromptStatus)
//!   - `services/`: Pure text transforms of the generation pipeline
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Record store interface (the graph API)
//!   - `services/`: Model inference and workflow interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use promptgen::domain::{PromptRecord, PromptStatus};
//! use promptgen::ports::{ModelProvider, PromptRepository, WorkflowStarter};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    build_assistant_partial, build_generation_prompt, extract_prompt, normalize_instructions,
    ChangeKind, DomainError, GenerationError, GenerationOutcome, GenerationRequest, PromptChange,
    PromptRecord, PromptStatus, METAPROMPT_TEMPLATE, TASK_PLACEHOLDER,
};
pub use ports::{
    ChatMessage, CompletionOptions, ContentBlock, MessageRole, ModelProvider, PromptRepository,
    WorkflowStarter,
};
