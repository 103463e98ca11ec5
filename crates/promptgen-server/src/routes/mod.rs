//! Prompt Generator API Routes
//!
//! - /createPrompt - Start generation (fire-and-forget)
//! - /prompts - Record queries and deletion
//! - /prompts/subscribe - Live record changes (WebSocket)

pub mod prompt;
pub mod subscription;
pub mod swagger;
