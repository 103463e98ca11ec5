//! Domain Services
//!
//! Pure transforms used by the prompt generation worker.

mod generation;

pub use generation::*;
