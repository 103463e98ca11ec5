//! Prompt Repository Port
//!
//! Abstract interface over the graph API that owns prompt records.
//! Operation names follow the API: getPrompt, listPrompts, getAllPrompts,
//! putPrompt, updatePrompt and deletePrompt.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{errors::DomainError, PromptChange, PromptRecord, PromptStatus};

/// Repository interface for prompt records
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// Find a record by id
    async fn get_prompt(&self, id: &str) -> Result<Option<PromptRecord>, DomainError>;

    /// List the records owned by `owner`
    async fn list_prompts(&self, owner: &str) -> Result<Vec<PromptRecord>, DomainError>;

    /// List every record regardless of owner
    async fn get_all_prompts(&self) -> Result<Vec<PromptRecord>, DomainError>;

    /// Store a new record
    async fn put_prompt(&self, record: &PromptRecord) -> Result<PromptRecord, DomainError>;

    /// Write a status, and the generated text when given
    async fn update_prompt(
        &self,
        id: &str,
        status: PromptStatus,
        prompt: Option<&str>,
    ) -> Result<PromptRecord, DomainError>;

    /// Remove a record; returns whether it existed
    async fn delete_prompt(&self, id: &str) -> Result<bool, DomainError>;

    /// Live feed of record changes, if this store can provide one
    fn subscribe(&self) -> Option<broadcast::Receiver<PromptChange>> {
        None
    }

    /// Name of the backing store, for logs
    fn store_name(&self) -> &str;
}
