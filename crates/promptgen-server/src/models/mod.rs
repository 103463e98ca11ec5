//! Request/response bodies of the HTTP surface
//!
//! Records themselves are served as the domain `PromptRecord`.

mod prompt;

pub use prompt::*;
