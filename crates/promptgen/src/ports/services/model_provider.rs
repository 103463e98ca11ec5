//! Model Provider Port
//!
//! Abstract interface for model inference. The generation worker sends a
//! short conversation and receives the reply as a list of content blocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// A trailing assistant message is continued by the model, not answered.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Options for a model call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0 - 1.0)
    pub temperature: Option<f32>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: Some(4096),
            temperature: Some(0.0),
        }
    }
}

/// One block of the model's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    Text(String),
    /// Any non-text block (tool use, reasoning, images); carries its kind
    Other(String),
}

impl ContentBlock {
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) => Some(text.as_str()),
            ContentBlock::Other(_) => None,
        }
    }
}

/// Model inference interface
///
/// # Example
///
/// ```rust,ignore
/// use promptgen::ports::ModelProvider;
///
/// struct BedrockModelProvider { /* aws client */ }
///
/// #[async_trait]
/// impl ModelProvider for BedrockModelProvider {
///     async fn converse(&self, messages: &[ChatMessage], options: &CompletionOptions)
///         -> Result<Vec<ContentBlock>, DomainError> {
///         // Call the Converse API
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send the conversation and return the reply's content blocks
    async fn converse(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Vec<ContentBlock>, DomainError>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
