//! Prompt generator API client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// API Client for the prompt generator
pub struct PromptClient {
    client: Client,
    base_url: String,
    token: String,
}

// ============================================
// API Types
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptResponse {
    pub prompt_id: String,
    pub execution_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub id: String,
    pub owner: String,
    pub task: String,
    #[serde(default)]
    pub variables: Vec<String>,
    pub status: String,
    pub prompt: Option<String>,
    pub created_at: Option<String>,
}

impl PromptResponse {
    /// GENERATED and ERROR never change again
    pub fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "GENERATED" | "ERROR")
    }
}

impl PromptClient {
    /// Create a new API client
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", self.token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let resp = self
            .authed(builder)
            .send()
            .await
            .context("Failed to connect to the prompt generator API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.send(builder)
            .await?
            .json()
            .await
            .context("Failed to parse response")
    }

    /// Submit a task; returns once generation has started
    pub async fn create_prompt(
        &self,
        task: &str,
        variables: &[String],
    ) -> Result<CreatePromptResponse> {
        let url = format!("{}/createPrompt", self.base_url);
        let body = CreatePromptRequest {
            task: task.to_string(),
            variables: if variables.is_empty() {
                None
            } else {
                Some(variables.to_vec())
            },
        };

        self.send_json(self.client.post(&url).json(&body)).await
    }

    /// List the caller's prompts, or every prompt with `all`
    pub async fn list_prompts(&self, all: bool) -> Result<Vec<PromptResponse>> {
        let url = if all {
            format!("{}/prompts/all", self.base_url)
        } else {
            format!("{}/prompts", self.base_url)
        };

        self.send_json(self.client.get(&url)).await
    }

    pub async fn get_prompt(&self, id: &str) -> Result<PromptResponse> {
        let url = format!("{}/prompts/{}", self.base_url, urlencoding::encode(id));
        self.send_json(self.client.get(&url)).await
    }

    /// Returns false when the prompt did not exist
    pub async fn delete_prompt(&self, id: &str) -> Result<bool> {
        let url = format!("{}/prompts/{}", self.base_url, urlencoding::encode(id));
        let resp = self
            .authed(self.client.delete(&url))
            .send()
            .await
            .context("Failed to connect to the prompt generator API")?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                let body = resp.text().await.unwrap_or_default();
                bail!("API error ({}): {}", status, body);
            }
        }
    }
}
