//! PromptRecord - The persisted prompt entity
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::value_objects::PromptStatus;

/// A prompt record as stored behind the graph API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub id: String,
    /// Identity subject of the creator; never changes after creation
    pub owner: String,
    pub task: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub variables: Vec<String>,
    pub status: PromptStatus,
    /// Generated prompt text, present once GENERATED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PromptRecord {
    /// Create a new record in CREATED status with a fresh id
    pub fn new(owner: impl Into<String>, task: impl Into<String>, variables: Vec<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), owner, task, variables)
    }

    /// Create a new record in CREATED status with a caller-supplied id
    pub fn with_id(
        id: impl Into<String>,
        owner: impl Into<String>,
        task: impl Into<String>,
        variables: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            owner: owner.into(),
            task: task.into(),
            variables,
            status: PromptStatus::Created,
            prompt: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Apply a status write.
    ///
    /// The generated text is only replaced when one is supplied, mirroring
    /// the `updatePrompt(id, status, prompt?)` mutation.
    pub fn apply_status(&mut self, status: PromptStatus, prompt: Option<String>) {
        self.status = status;
        if prompt.is_some() {
            self.prompt = prompt;
        }
        self.updated_at = Some(Utc::now());
    }
}

/// The graph API returns `null` for a list that was never set.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of change published to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Put,
    Update,
    Delete,
}

/// A record change as seen by a live subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PromptChange {
    pub kind: ChangeKind,
    pub record: PromptRecord,
}

impl PromptChange {
    pub fn new(kind: ChangeKind, record: PromptRecord) -> Self {
        Self { kind, record }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_created() {
        let record = PromptRecord::new("user-1", "Write a haiku", vec!["topic".into()]);
        assert_eq!(record.status, PromptStatus::Created);
        assert!(record.prompt.is_none());
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn test_apply_status_keeps_prompt_when_absent() {
        let mut record = PromptRecord::with_id("p1", "user-1", "task", vec![]);
        record.apply_status(PromptStatus::Generating, Some("draft".into()));
        record.apply_status(PromptStatus::Error, None);
        assert_eq!(record.status, PromptStatus::Error);
        assert_eq!(record.prompt.as_deref(), Some("draft"));
    }

    #[test]
    fn test_deserializes_graph_api_shape() {
        let json = r#"{"id":"p1","owner":"sub-1","task":"t","variables":null,"status":"CREATED","prompt":null}"#;
        let record: PromptRecord = serde_json::from_str(json).unwrap();
        assert!(record.variables.is_empty());
        assert!(record.created_at.is_none());

        let json = r#"{"id":"p1","owner":"sub-1","task":"t","status":"GENERATED","prompt":"done"}"#;
        let record: PromptRecord = serde_json::from_str(json).unwrap();
        assert!(record.variables.is_empty());
        assert_eq!(record.prompt.as_deref(), Some("done"));
    }
}
