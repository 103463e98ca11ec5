//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod prompt_status;

pub use prompt_status::*;
