//! AppSync Prompt Store
//!
//! Talks to the managed GraphQL API over HTTPS with an API key, the same
//! way the worker function is authorized against it.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use promptgen::{DomainError, PromptRecord, PromptRepository, PromptStatus};

use crate::config::AppSyncConfig;

const PROMPT_FIELDS: &str = "id owner prompt status task variables";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(rename = "errorType")]
    error_type: Option<String>,
}

/// GraphQL-backed implementation of PromptRepository
pub struct AppSyncPromptRepository {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AppSyncPromptRepository {
    pub fn new(config: &AppSyncConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::Repository(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Run one operation and decode `data.<field>`
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<Option<T>, DomainError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| DomainError::Repository(format!("GraphQL request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Repository(format!("Failed to read GraphQL response: {e}")))?;

        if !status.is_success() {
            return Err(DomainError::Repository(format!(
                "GraphQL endpoint returned {}: {}",
                status, body
            )));
        }

        parse_field(&body, field)
    }
}

/// Decode `data.<field>` from a GraphQL response body.
///
/// Any entry in `errors` fails the whole operation, even alongside data.
fn parse_field<T: DeserializeOwned>(body: &str, field: &str) -> Result<Option<T>, DomainError> {
    let envelope: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| DomainError::Repository(format!("Malformed GraphQL response: {e}")))?;

    if !envelope.errors.is_empty() {
        let messages = envelope
            .errors
            .iter()
            .map(|e| match &e.error_type {
                Some(kind) => format!("{}: {}", kind, e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(DomainError::Repository(messages));
    }

    match envelope.data.and_then(|mut data| data.get_mut(field).map(Value::take)) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DomainError::Repository(format!("Unexpected {field} payload: {e}"))),
    }
}

#[async_trait]
impl PromptRepository for AppSyncPromptRepository {
    async fn get_prompt(&self, id: &str) -> Result<Option<PromptRecord>, DomainError> {
        let query =
            format!("query GetPrompt($id: ID!) {{ getPrompt(id: $id) {{ {PROMPT_FIELDS} }} }}");
        self.execute(&query, json!({ "id": id }), "getPrompt").await
    }

    async fn list_prompts(&self, owner: &str) -> Result<Vec<PromptRecord>, DomainError> {
        // Under API-key auth the resolver has no identity to scope by.
        let query = format!("query ListPrompts {{ listPrompts {{ {PROMPT_FIELDS} }} }}");
        let records: Vec<PromptRecord> = self
            .execute(&query, json!({}), "listPrompts")
            .await?
            .unwrap_or_default();
        Ok(records.into_iter().filter(|r| r.owner == owner).collect())
    }

    async fn get_all_prompts(&self) -> Result<Vec<PromptRecord>, DomainError> {
        let query = format!("query GetAllPrompts {{ getAllPrompts {{ {PROMPT_FIELDS} }} }}");
        Ok(self
            .execute(&query, json!({}), "getAllPrompts")
            .await?
            .unwrap_or_default())
    }

    async fn put_prompt(&self, record: &PromptRecord) -> Result<PromptRecord, DomainError> {
        let query = format!(
            "mutation PutPrompt($id: ID!, $owner: String!, $task: String!, $variables: [String], $status: PromptStatus!) \
             {{ putPrompt(id: $id, owner: $owner, task: $task, variables: $variables, status: $status) {{ {PROMPT_FIELDS} }} }}"
        );
        let variables = json!({
            "id": record.id,
            "owner": record.owner,
            "task": record.task,
            "variables": record.variables,
            "status": record.status,
        });
        self.execute(&query, variables, "putPrompt")
            .await?
            .ok_or_else(|| DomainError::Repository("putPrompt returned no record".to_string()))
    }

    async fn update_prompt(
        &self,
        id: &str,
        status: PromptStatus,
        prompt: Option<&str>,
    ) -> Result<PromptRecord, DomainError> {
        let (query, variables) = match prompt {
            Some(text) => (
                format!(
                    "mutation UpdatePrompt($id: ID!, $status: PromptStatus!, $prompt: String) \
                     {{ updatePrompt(id: $id, status: $status, prompt: $prompt) {{ {PROMPT_FIELDS} }} }}"
                ),
                json!({ "id": id, "status": status, "prompt": text }),
            ),
            None => (
                format!(
                    "mutation UpdatePrompt($id: ID!, $status: PromptStatus!) \
                     {{ updatePrompt(id: $id, status: $status) {{ {PROMPT_FIELDS} }} }}"
                ),
                json!({ "id": id, "status": status }),
            ),
        };

        self.execute(&query, variables, "updatePrompt")
            .await?
            .ok_or_else(|| DomainError::not_found("Prompt", id))
    }

    async fn delete_prompt(&self, id: &str) -> Result<bool, DomainError> {
        let query = format!(
            "mutation DeletePrompt($id: ID!) {{ deletePrompt(id: $id) {{ {PROMPT_FIELDS} }} }}"
        );
        let deleted: Option<PromptRecord> =
            self.execute(&query, json!({ "id": id }), "deletePrompt").await?;
        Ok(deleted.is_some())
    }

    fn store_name(&self) -> &str {
        "appsync"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{"id":"p1","owner":"sub-1","prompt":null,"status":"GENERATING","task":"t","variables":["topic"]}"#;

    fn repo(url: String) -> AppSyncPromptRepository {
        AppSyncPromptRepository::new(&AppSyncConfig {
            endpoint: format!("{}/graphql", url),
            api_key: "da2-key".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_field_reads_data() {
        let body = format!(r#"{{"data":{{"getPrompt":{}}}}}"#, RECORD);
        let record: Option<PromptRecord> = parse_field(&body, "getPrompt").unwrap();
        let record = record.unwrap();
        assert_eq!(record.status, PromptStatus::Generating);
        assert_eq!(record.variables, vec!["topic".to_string()]);
    }

    #[test]
    fn test_parse_field_null_is_none() {
        let record: Option<PromptRecord> =
            parse_field(r#"{"data":{"getPrompt":null}}"#, "getPrompt").unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_parse_field_surfaces_errors() {
        let body = r#"{"data":null,"errors":[{"message":"Not Authorized","errorType":"Unauthorized"}]}"#;
        let err = parse_field::<PromptRecord>(body, "updatePrompt").unwrap_err();
        assert!(err.to_string().contains("Unauthorized: Not Authorized"));
    }

    #[tokio::test]
    async fn test_update_sends_api_key_and_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("x-api-key", "da2-key")
            .match_body(mockito::Matcher::PartialJson(json!({
                "variables": { "id": "p1", "status": "GENERATING" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"data":{{"updatePrompt":{}}}}}"#, RECORD))
            .create_async()
            .await;

        let record = repo(server.url())
            .update_prompt("p1", PromptStatus::Generating, None)
            .await
            .unwrap();

        assert_eq!(record.id, "p1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_failure_is_repository_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let err = repo(server.url()).get_prompt("p1").await.unwrap_err();
        assert!(matches!(err, DomainError::Repository(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let mut server = mockito::Server::new_async().await;
        let other = RECORD.replace("sub-1", "sub-2").replace("\"p1\"", "\"p2\"");
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(format!(
                r#"{{"data":{{"listPrompts":[{},{}]}}}}"#,
                RECORD, other
            ))
            .create_async()
            .await;

        let records = repo(server.url()).list_prompts("sub-2").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "p2");
    }
}
