//! Prompt submission DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /createPrompt`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    /// Existing record to generate for; a new record is created when omitted
    #[serde(default)]
    pub id: Option<String>,
    pub task: String,
    #[serde(default)]
    pub variables: Option<Vec<String>>,
}

/// Returned once the workflow execution has been started
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptResponse {
    pub prompt_id: String,
    pub execution_id: String,
}
