//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - PromptRecord: The persisted prompt tracked by id and status
//! - PromptChange: A change notification for live subscribers
//! - GenerationRequest: Payload carried through the workflow to the worker

mod generation;
mod prompt;

pub use generation::*;
pub use prompt::*;
