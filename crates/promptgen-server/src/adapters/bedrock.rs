//! Bedrock Model Provider
//!
//! Calls the Converse API. A trailing assistant message is sent as-is so
//! the model continues it rather than starting a new turn.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::types::{
    ContentBlock as BedrockBlock, ConversationRole, InferenceConfiguration, Message,
};
use aws_sdk_bedrockruntime::Client;

use promptgen::{
    ChatMessage, CompletionOptions, ContentBlock, DomainError, MessageRole, ModelProvider,
};

pub struct BedrockModelProvider {
    client: Client,
    model_id: String,
}

impl BedrockModelProvider {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Build a client for `region` from the default credential chain
    pub async fn from_region(region: &str, model_id: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config), model_id)
    }
}

fn to_bedrock_message(message: &ChatMessage) -> Result<Message, DomainError> {
    let role = match message.role {
        MessageRole::User => ConversationRole::User,
        MessageRole::Assistant => ConversationRole::Assistant,
    };

    Message::builder()
        .role(role)
        .content(BedrockBlock::Text(message.content.clone()))
        .build()
        .map_err(|e| DomainError::ExternalService(format!("Failed to build message: {e}")))
}

fn from_bedrock_block(block: &BedrockBlock) -> ContentBlock {
    match block {
        BedrockBlock::Text(text) => ContentBlock::Text(text.clone()),
        BedrockBlock::ToolUse(_) => ContentBlock::Other("tool_use".to_string()),
        BedrockBlock::Image(_) => ContentBlock::Other("image".to_string()),
        _ => ContentBlock::Other("unknown".to_string()),
    }
}

fn describe_error(err: &SdkError<ConverseError>) -> String {
    match err.as_service_error() {
        Some(ConverseError::ModelTimeoutException(_)) => "Model took too long".to_string(),
        Some(ConverseError::ModelNotReadyException(_)) => "Model is not ready".to_string(),
        Some(ConverseError::ThrottlingException(_)) => "Request was throttled".to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

#[async_trait]
impl ModelProvider for BedrockModelProvider {
    async fn converse(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Vec<ContentBlock>, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::Validation("No messages to send".to_string()));
        }

        let bedrock_messages = messages
            .iter()
            .map(to_bedrock_message)
            .collect::<Result<Vec<_>, _>>()?;

        let inference = InferenceConfiguration::builder()
            .set_max_tokens(options.max_tokens.map(|t| t as i32))
            .set_temperature(options.temperature)
            .build();

        tracing::debug!(
            "Converse with {} ({} messages)",
            self.model_id,
            bedrock_messages.len()
        );

        let output = self
            .client
            .converse()
            .model_id(&self.model_id)
            .set_messages(Some(bedrock_messages))
            .inference_config(inference)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Bedrock Converse call failed: {}", DisplayErrorContext(&e));
                DomainError::ExternalService(describe_error(&e))
            })?;

        if let Some(usage) = output.usage() {
            tracing::info!(
                "Converse usage: {} input / {} output tokens, stop reason {:?}",
                usage.input_tokens(),
                usage.output_tokens(),
                output.stop_reason()
            );
        }

        let content = output
            .output()
            .and_then(|o| o.as_message().ok())
            .map(|message| message.content().iter().map(from_bedrock_block).collect())
            .unwrap_or_default();

        Ok(content)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
