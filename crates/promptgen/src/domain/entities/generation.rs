//! Generation payloads carried through the workflow

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::PromptStatus;

/// Input of a workflow execution and of the worker step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt_id: String,
    pub task: String,
    #[serde(default)]
    pub variables: Vec<String>,
}

impl GenerationRequest {
    pub fn new(
        prompt_id: impl Into<String>,
        task: impl Into<String>,
        variables: Vec<String>,
    ) -> Self {
        Self {
            prompt_id: prompt_id.into(),
            task: task.into(),
            variables,
        }
    }
}

/// Output of the worker step, mapped as the workflow result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub prompt_id: String,
    pub status: PromptStatus,
}
