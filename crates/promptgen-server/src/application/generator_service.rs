//! Prompt Generation Worker (Use Case)
//!
//! Marks the record GENERATING, asks the model to write instructions for
//! the task, and stores the extracted text as GENERATED. Any failure ends
//! in a single best-effort ERROR write; nothing is retried.

use std::sync::Arc;

use promptgen::{
    build_assistant_partial, build_generation_prompt, extract_prompt, ChatMessage,
    CompletionOptions, GenerationError, GenerationOutcome, GenerationRequest, ModelProvider,
    PromptRepository, PromptStatus,
};

/// Application service run once per workflow execution
pub struct PromptGenerator {
    repo: Arc<dyn PromptRepository>,
    model: Arc<dyn ModelProvider>,
    options: CompletionOptions,
}

impl PromptGenerator {
    pub fn new(repo: Arc<dyn PromptRepository>, model: Arc<dyn ModelProvider>) -> Self {
        Self {
            repo,
            model,
            options: CompletionOptions::default(),
        }
    }

    /// Run the whole pipeline; never fails, the outcome says how it ended
    pub async fn handle(&self, request: &GenerationRequest) -> GenerationOutcome {
        let prompt_id = request.prompt_id.clone();

        match self.generate(request).await {
            Ok(text) => {
                tracing::info!(
                    prompt_id = %prompt_id,
                    "Prompt generated ({} lines)",
                    text.lines().count()
                );
                GenerationOutcome {
                    prompt_id,
                    status: PromptStatus::Generated,
                }
            }
            Err(e) => {
                tracing::error!(prompt_id = %prompt_id, "Error generating prompt: {}", e);

                let status = match self
                    .repo
                    .update_prompt(&prompt_id, PromptStatus::Error, None)
                    .await
                {
                    Ok(record) => record.status,
                    Err(update_err) => {
                        tracing::error!(
                            prompt_id = %prompt_id,
                            "Failed to mark prompt as ERROR: {}",
                            update_err
                        );
                        self.stored_status(&prompt_id).await
                    }
                };

                GenerationOutcome { prompt_id, status }
            }
        }
    }

    /// Status the store holds after a rejected ERROR write, e.g. a record
    /// that an earlier execution already finished. Unknown means ERROR.
    async fn stored_status(&self, prompt_id: &str) -> PromptStatus {
        match self.repo.get_prompt(prompt_id).await {
            Ok(Some(record)) => record.status,
            Ok(None) => PromptStatus::Error,
            Err(e) => {
                tracing::warn!(prompt_id = %prompt_id, "Could not re-read prompt: {}", e);
                PromptStatus::Error
            }
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let prompt_id = request.prompt_id.as_str();

        tracing::info!(
            prompt_id = %prompt_id,
            "Updating {} with status GENERATING",
            self.repo.store_name()
        );
        self.repo
            .update_prompt(prompt_id, PromptStatus::Generating, None)
            .await
            .map_err(GenerationError::Store)?;

        let generation_prompt = build_generation_prompt(&request.task);
        let assistant_partial = build_assistant_partial(&request.variables);
        tracing::debug!(prompt_id = %prompt_id, "Assistant partial:\n{}", assistant_partial);

        let messages = [
            ChatMessage::user(generation_prompt),
            ChatMessage::assistant(assistant_partial),
        ];
        let content = self
            .model
            .converse(&messages, &self.options)
            .await
            .map_err(GenerationError::Model)?;
        tracing::debug!(
            prompt_id = %prompt_id,
            "Model {} replied with {} content blocks",
            self.model.model_id(),
            content.len()
        );

        let generated = extract_prompt(&content)?;

        tracing::info!(
            prompt_id = %prompt_id,
            "Updating {} with status GENERATED",
            self.repo.store_name()
        );
        self.repo
            .update_prompt(prompt_id, PromptStatus::Generated, Some(&generated))
            .await
            .map_err(GenerationError::Store)?;

        Ok(generated)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::broadcast;

    use crate::adapters::InMemoryPromptRepository;
    use promptgen::{
        ContentBlock, DomainError, MessageRole, PromptChange, PromptRecord, METAPROMPT_TEMPLATE,
    };

    /// Model fake returning a fixed reply and remembering what it was sent
    pub(crate) struct ScriptedModel {
        reply: Result<Vec<ContentBlock>, String>,
        pub(crate) seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedModel {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(vec![ContentBlock::Text(text.to_string())]),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedModel {
        async fn converse(
            &self,
            messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<Vec<ContentBlock>, DomainError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.reply
                .clone()
                .map_err(DomainError::ExternalService)
        }

        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    /// Store whose GENERATING write always fails
    struct RejectingGenerating {
        inner: InMemoryPromptRepository,
    }

    #[async_trait]
    impl PromptRepository for RejectingGenerating {
        async fn get_prompt(&self, id: &str) -> Result<Option<PromptRecord>, DomainError> {
            self.inner.get_prompt(id).await
        }
        async fn list_prompts(&self, owner: &str) -> Result<Vec<PromptRecord>, DomainError> {
            self.inner.list_prompts(owner).await
        }
        async fn get_all_prompts(&self) -> Result<Vec<PromptRecord>, DomainError> {
            self.inner.get_all_prompts().await
        }
        async fn put_prompt(&self, record: &PromptRecord) -> Result<PromptRecord, DomainError> {
            self.inner.put_prompt(record).await
        }
        async fn update_prompt(
            &self,
            id: &str,
            status: PromptStatus,
            prompt: Option<&str>,
        ) -> Result<PromptRecord, DomainError> {
            if status == PromptStatus::Generating {
                return Err(DomainError::Repository("network down".to_string()));
            }
            self.inner.update_prompt(id, status, prompt).await
        }
        async fn delete_prompt(&self, id: &str) -> Result<bool, DomainError> {
            self.inner.delete_prompt(id).await
        }
        fn store_name(&self) -> &str {
            "rejecting"
        }
    }

    pub(crate) async fn seeded_repo(
        request: &GenerationRequest,
    ) -> Arc<InMemoryPromptRepository> {
        let repo = Arc::new(InMemoryPromptRepository::new());
        repo.put_prompt(&PromptRecord::with_id(
            request.prompt_id.clone(),
            "alice",
            request.task.clone(),
            request.variables.clone(),
        ))
        .await
        .unwrap();
        repo
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "p1",
            "Summarize a legal contract",
            vec!["contract".to_string()],
        )
    }

    fn drain(rx: &mut broadcast::Receiver<PromptChange>) -> Vec<PromptStatus> {
        let mut statuses = Vec::new();
        while let Ok(change) = rx.try_recv() {
            statuses.push(change.record.status);
        }
        statuses
    }

    #[tokio::test]
    async fn test_success_stores_generated_prompt() {
        let request = request();
        let repo = seeded_repo(&request).await;
        let model = Arc::new(ScriptedModel::replying(
            "plan</Instructions Structure>\n<Instructions>\n  Read {$CONTRACT}\n\n  Summarize it\n</Instructions>",
        ));
        let generator = PromptGenerator::new(repo.clone(), model.clone());

        let outcome = generator.handle(&request).await;

        assert_eq!(outcome.status, PromptStatus::Generated);
        let record = repo.get_prompt("p1").await.unwrap().unwrap();
        assert_eq!(record.status, PromptStatus::Generated);
        assert_eq!(
            record.prompt.as_deref(),
            Some("Read {$CONTRACT}\nSummarize it")
        );
    }

    #[tokio::test]
    async fn test_model_receives_two_turn_exchange() {
        let request = request();
        let repo = seeded_repo(&request).await;
        let model = Arc::new(ScriptedModel::replying("<Instructions>x</Instructions>"));
        PromptGenerator::new(repo, model.clone()).handle(&request).await;

        let seen = model.seen.lock().unwrap();
        let messages = &seen[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert!(messages[0].content.contains("Summarize a legal contract"));
        assert!(messages[0].content.len() > METAPROMPT_TEMPLATE.len() - 10);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(
            messages[1].content,
            "<Inputs>{CONTRACT}\n</Inputs>\n<Instructions Structure>"
        );
    }

    #[tokio::test]
    async fn test_subscriber_sees_generating_before_generated() {
        let request = request();
        let repo = seeded_repo(&request).await;
        let mut rx = repo.subscribe().unwrap();
        let model = Arc::new(ScriptedModel::replying("<Instructions>ok</Instructions>"));

        PromptGenerator::new(repo.clone(), model).handle(&request).await;

        assert_eq!(
            drain(&mut rx),
            vec![PromptStatus::Generating, PromptStatus::Generated]
        );
    }

    #[tokio::test]
    async fn test_missing_tag_ends_in_error() {
        let request = request();
        let repo = seeded_repo(&request).await;
        let mut rx = repo.subscribe().unwrap();
        let model = Arc::new(ScriptedModel::replying("I cannot help with that."));

        let outcome = PromptGenerator::new(repo.clone(), model).handle(&request).await;

        assert_eq!(outcome.status, PromptStatus::Error);
        assert_eq!(
            drain(&mut rx),
            vec![PromptStatus::Generating, PromptStatus::Error]
        );
        let record = repo.get_prompt("p1").await.unwrap().unwrap();
        assert!(record.prompt.is_none());
    }

    #[tokio::test]
    async fn test_model_failure_ends_in_error() {
        let request = request();
        let repo = seeded_repo(&request).await;
        let model = Arc::new(ScriptedModel::failing("throttled"));

        let outcome = PromptGenerator::new(repo.clone(), model).handle(&request).await;

        assert_eq!(outcome.status, PromptStatus::Error);
        let record = repo.get_prompt("p1").await.unwrap().unwrap();
        assert_eq!(record.status, PromptStatus::Error);
    }

    #[tokio::test]
    async fn test_store_failure_skips_model_and_marks_error() {
        let request = request();
        let inner = InMemoryPromptRepository::new();
        inner
            .put_prompt(&PromptRecord::with_id("p1", "alice", "t", vec![]))
            .await
            .unwrap();
        let repo = Arc::new(RejectingGenerating { inner });
        let model = Arc::new(ScriptedModel::replying("<Instructions>ok</Instructions>"));

        let outcome = PromptGenerator::new(repo.clone(), model.clone())
            .handle(&request)
            .await;

        assert_eq!(outcome.status, PromptStatus::Error);
        assert!(model.seen.lock().unwrap().is_empty());
        let record = repo.get_prompt("p1").await.unwrap().unwrap();
        assert_eq!(record.status, PromptStatus::Error);
    }

    #[tokio::test]
    async fn test_rerun_on_generated_record_reports_stored_status() {
        let request = request();
        let repo = seeded_repo(&request).await;
        let first = Arc::new(ScriptedModel::replying("<Instructions>first</Instructions>"));
        let outcome = PromptGenerator::new(repo.clone(), first).handle(&request).await;
        assert_eq!(outcome.status, PromptStatus::Generated);

        let second = Arc::new(ScriptedModel::replying("<Instructions>second</Instructions>"));
        let outcome = PromptGenerator::new(repo.clone(), second.clone())
            .handle(&request)
            .await;

        assert_eq!(outcome.status, PromptStatus::Generated);
        assert!(second.seen.lock().unwrap().is_empty());
        let record = repo.get_prompt("p1").await.unwrap().unwrap();
        assert_eq!(record.status, PromptStatus::Generated);
        assert_eq!(record.prompt.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_unknown_record_still_reports_error() {
        let repo = Arc::new(InMemoryPromptRepository::new());
        let model = Arc::new(ScriptedModel::replying("<Instructions>ok</Instructions>"));

        let outcome = PromptGenerator::new(repo, model).handle(&request()).await;

        assert_eq!(outcome.status, PromptStatus::Error);
    }
}
