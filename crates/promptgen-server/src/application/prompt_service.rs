//! Prompt Application Service (Use Case)
//!
//! Accepts generation requests and serves the caller's records.

use std::sync::Arc;
use thiserror::Error;

use promptgen::{DomainError, GenerationRequest, PromptRecord, PromptRepository, WorkflowStarter};

use crate::models::{CreatePromptRequest, CreatePromptResponse};

/// Why a generation request was not accepted
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Prompt {0} not found")]
    NotFound(String),

    #[error("Failed to create prompt record: {0}")]
    Record(#[source] DomainError),

    #[error("Failed to start prompt generation: {0}")]
    Workflow(#[source] DomainError),
}

/// Application service behind the HTTP surface
pub struct PromptService {
    repo: Arc<dyn PromptRepository>,
    workflow: Arc<dyn WorkflowStarter>,
}

impl PromptService {
    pub fn new(repo: Arc<dyn PromptRepository>, workflow: Arc<dyn WorkflowStarter>) -> Self {
        Self { repo, workflow }
    }

    /// Start generation for a record, creating the record first when no id is given.
    ///
    /// Returns as soon as the execution has started.
    pub async fn create_prompt(
        &self,
        owner: &str,
        payload: CreatePromptRequest,
    ) -> Result<CreatePromptResponse, SubmitError> {
        let variables = payload.variables.unwrap_or_default();

        let prompt_id = match payload.id {
            Some(id) => {
                // Generation overwrites the record, so it must be the caller's.
                self.get(owner, &id)
                    .await
                    .map_err(SubmitError::Record)?
                    .ok_or_else(|| SubmitError::NotFound(id.clone()))?;
                id
            }
            None => {
                let record = PromptRecord::new(owner, payload.task.clone(), variables.clone());
                let saved = self
                    .repo
                    .put_prompt(&record)
                    .await
                    .map_err(SubmitError::Record)?;
                tracing::info!("Created prompt record {} for {}", saved.id, owner);
                saved.id
            }
        };

        let request = GenerationRequest::new(prompt_id, payload.task, variables);
        let execution_id = self
            .workflow
            .start(&request)
            .await
            .map_err(SubmitError::Workflow)?;

        tracing::info!(
            prompt_id = %request.prompt_id,
            "Started {} execution {}",
            self.workflow.orchestrator_name(),
            execution_id
        );

        Ok(CreatePromptResponse {
            prompt_id: request.prompt_id,
            execution_id,
        })
    }

    /// Records owned by `owner`
    pub async fn list(&self, owner: &str) -> Result<Vec<PromptRecord>, DomainError> {
        self.repo.list_prompts(owner).await
    }

    pub async fn list_all(&self) -> Result<Vec<PromptRecord>, DomainError> {
        self.repo.get_all_prompts().await
    }

    /// A record owned by `owner`; other owners' records read as missing
    pub async fn get(&self, owner: &str, id: &str) -> Result<Option<PromptRecord>, DomainError> {
        Ok(self
            .repo
            .get_prompt(id)
            .await?
            .filter(|record| record.owner == owner))
    }

    /// Delete a record owned by `owner`; returns false when there was none
    pub async fn delete(&self, owner: &str, id: &str) -> Result<bool, DomainError> {
        if self.get(owner, id).await?.is_none() {
            return Ok(false);
        }
        let deleted = self.repo.delete_prompt(id).await?;
        if deleted {
            tracing::info!("Deleted prompt {}", id);
        }
        Ok(deleted)
    }

    pub fn repository(&self) -> &Arc<dyn PromptRepository> {
        &self.repo
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::adapters::InMemoryPromptRepository;
    use promptgen::PromptStatus;

    /// Workflow fake recording every start
    #[derive(Default)]
    pub(crate) struct RecordingWorkflow {
        pub(crate) started: Mutex<Vec<GenerationRequest>>,
        pub(crate) fail: bool,
    }

    #[async_trait]
    impl WorkflowStarter for RecordingWorkflow {
        async fn start(&self, request: &GenerationRequest) -> Result<String, DomainError> {
            if self.fail {
                return Err(DomainError::ExternalService("ExecutionLimitExceeded".to_string()));
            }
            let mut started = self.started.lock().unwrap();
            started.push(request.clone());
            Ok(format!("execution-{}", started.len()))
        }

        fn orchestrator_name(&self) -> &str {
            "recording"
        }
    }

    fn service(workflow: Arc<RecordingWorkflow>) -> (PromptService, Arc<InMemoryPromptRepository>) {
        let repo = Arc::new(InMemoryPromptRepository::new());
        (PromptService::new(repo.clone(), workflow), repo)
    }

    fn payload(id: Option<&str>) -> CreatePromptRequest {
        CreatePromptRequest {
            id: id.map(str::to_string),
            task: "Classify support tickets".to_string(),
            variables: Some(vec!["ticket".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_create_without_id_puts_record_and_starts_once() {
        let workflow = Arc::new(RecordingWorkflow::default());
        let (service, repo) = service(workflow.clone());

        let response = service.create_prompt("alice", payload(None)).await.unwrap();

        assert_eq!(response.execution_id, "execution-1");
        let record = repo.get_prompt(&response.prompt_id).await.unwrap().unwrap();
        assert_eq!(record.status, PromptStatus::Created);
        assert_eq!(record.owner, "alice");

        let started = workflow.started.lock().unwrap();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].prompt_id, response.prompt_id);
        assert_eq!(started[0].variables, vec!["ticket".to_string()]);
    }

    #[tokio::test]
    async fn test_create_with_id_passes_it_through() {
        let workflow = Arc::new(RecordingWorkflow::default());
        let (service, repo) = service(workflow.clone());
        repo.put_prompt(&PromptRecord::with_id("existing", "alice", "t", vec![]))
            .await
            .unwrap();

        let response = service
            .create_prompt("alice", payload(Some("existing")))
            .await
            .unwrap();

        assert_eq!(response.prompt_id, "existing");
        assert_eq!(repo.get_all_prompts().await.unwrap().len(), 1);
        assert_eq!(
            workflow.started.lock().unwrap()[0].task,
            "Classify support tickets"
        );
    }

    #[tokio::test]
    async fn test_create_on_another_owners_record_is_not_found() {
        let workflow = Arc::new(RecordingWorkflow::default());
        let (service, repo) = service(workflow.clone());
        repo.put_prompt(&PromptRecord::with_id("alice-rec", "alice", "t", vec![]))
            .await
            .unwrap();

        let err = service
            .create_prompt("bob", payload(Some("alice-rec")))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::NotFound(ref id) if id == "alice-rec"));
        assert!(workflow.started.lock().unwrap().is_empty());
        let record = repo.get_prompt("alice-rec").await.unwrap().unwrap();
        assert_eq!(record.status, PromptStatus::Created);
        assert_eq!(record.task, "t");
    }

    #[tokio::test]
    async fn test_create_with_unknown_id_is_not_found() {
        let workflow = Arc::new(RecordingWorkflow::default());
        let (service, _repo) = service(workflow.clone());

        let err = service
            .create_prompt("alice", payload(Some("missing")))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::NotFound(_)));
        assert!(workflow.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_workflow_failure_is_reported() {
        let workflow = Arc::new(RecordingWorkflow {
            fail: true,
            ..Default::default()
        });
        let (service, _repo) = service(workflow);

        let err = service.create_prompt("alice", payload(None)).await.unwrap_err();
        assert!(matches!(err, SubmitError::Workflow(_)));
    }

    #[tokio::test]
    async fn test_get_and_delete_are_owner_scoped() {
        let (service, repo) = service(Arc::new(RecordingWorkflow::default()));
        repo.put_prompt(&PromptRecord::with_id("p1", "alice", "t", vec![]))
            .await
            .unwrap();

        assert!(service.get("bob", "p1").await.unwrap().is_none());
        assert!(!service.delete("bob", "p1").await.unwrap());
        assert!(service.get("alice", "p1").await.unwrap().is_some());
        assert!(service.delete("alice", "p1").await.unwrap());
        assert!(service.list_all().await.unwrap().is_empty());
    }
}
