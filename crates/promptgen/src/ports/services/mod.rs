//! Service Ports
//!
//! Abstract interfaces for external services.

mod model_provider;
mod workflow;

pub use model_provider::*;
pub use workflow::*;
