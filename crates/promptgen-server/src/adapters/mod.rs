//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod appsync;
pub mod bedrock;
pub mod local_workflow;
pub mod memory;
pub mod step_functions;

// Re-exports
pub use appsync::AppSyncPromptRepository;
pub use bedrock::BedrockModelProvider;
pub use local_workflow::LocalWorkflow;
pub use memory::InMemoryPromptRepository;
pub use step_functions::StepFunctionsWorkflow;
