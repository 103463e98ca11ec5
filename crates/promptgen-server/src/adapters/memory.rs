//! In-memory prompt store
//!
//! Stands in for the managed table + graph API when running locally.
//! Publishes every change on a broadcast channel so subscribers see the
//! same status stream a graph API subscription would deliver.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

use promptgen::{
    ChangeKind, DomainError, PromptChange, PromptRecord, PromptRepository, PromptStatus,
};

/// Buffered changes per subscriber before it starts lagging
const CHANGE_CAPACITY: usize = 256;

pub struct InMemoryPromptRepository {
    records: RwLock<HashMap<String, PromptRecord>>,
    changes: broadcast::Sender<PromptChange>,
}

impl InMemoryPromptRepository {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            records: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn publish(&self, kind: ChangeKind, record: &PromptRecord) {
        // A send error only means nobody is subscribed.
        let _ = self.changes.send(PromptChange::new(kind, record.clone()));
    }
}

impl Default for InMemoryPromptRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(records: &mut [PromptRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl PromptRepository for InMemoryPromptRepository {
    async fn get_prompt(&self, id: &str) -> Result<Option<PromptRecord>, DomainError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn list_prompts(&self, owner: &str) -> Result<Vec<PromptRecord>, DomainError> {
        let mut records: Vec<_> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn get_all_prompts(&self) -> Result<Vec<PromptRecord>, DomainError> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn put_prompt(&self, record: &PromptRecord) -> Result<PromptRecord, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(DomainError::Conflict(format!(
                "Prompt {} already exists",
                record.id
            )));
        }
        records.insert(record.id.clone(), record.clone());
        self.publish(ChangeKind::Put, record);
        Ok(record.clone())
    }

    async fn update_prompt(
        &self,
        id: &str,
        status: PromptStatus,
        prompt: Option<&str>,
    ) -> Result<PromptRecord, DomainError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Prompt", id))?;

        if !record.status.can_transition_to(status) {
            return Err(DomainError::Conflict(format!(
                "Prompt {} cannot move from {} to {}",
                id, record.status, status
            )));
        }

        record.apply_status(status, prompt.map(str::to_string));
        let updated = record.clone();
        self.publish(ChangeKind::Update, &updated);
        Ok(updated)
    }

    async fn delete_prompt(&self, id: &str) -> Result<bool, DomainError> {
        let removed = self.records.write().await.remove(id);
        match removed {
            Some(record) => {
                self.publish(ChangeKind::Delete, &record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<PromptChange>> {
        Some(self.changes.subscribe())
    }

    fn store_name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, owner: &str) -> PromptRecord {
        PromptRecord::with_id(id, owner, "Write a limerick", vec![])
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let repo = InMemoryPromptRepository::new();
        repo.put_prompt(&record("p1", "alice")).await.unwrap();

        let found = repo.get_prompt("p1").await.unwrap().unwrap();
        assert_eq!(found.owner, "alice");

        assert!(repo.delete_prompt("p1").await.unwrap());
        assert!(!repo.delete_prompt("p1").await.unwrap());
        assert!(repo.get_prompt("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_rejects_duplicate_id() {
        let repo = InMemoryPromptRepository::new();
        repo.put_prompt(&record("p1", "alice")).await.unwrap();
        let err = repo.put_prompt(&record("p1", "bob")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_is_scoped_by_owner() {
        let repo = InMemoryPromptRepository::new();
        repo.put_prompt(&record("p1", "alice")).await.unwrap();
        repo.put_prompt(&record("p2", "bob")).await.unwrap();
        repo.put_prompt(&record("p3", "alice")).await.unwrap();

        let alice = repo.list_prompts("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.owner == "alice"));
        assert_eq!(repo.get_all_prompts().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_enforces_lifecycle() {
        let repo = InMemoryPromptRepository::new();
        repo.put_prompt(&record("p1", "alice")).await.unwrap();

        repo.update_prompt("p1", PromptStatus::Generating, None)
            .await
            .unwrap();
        let done = repo
            .update_prompt("p1", PromptStatus::Generated, Some("Step 1"))
            .await
            .unwrap();
        assert_eq!(done.prompt.as_deref(), Some("Step 1"));

        let err = repo
            .update_prompt("p1", PromptStatus::Generating, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = repo
            .update_prompt("missing", PromptStatus::Generating, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_in_order() {
        let repo = InMemoryPromptRepository::new();
        let mut rx = repo.subscribe().unwrap();

        repo.put_prompt(&record("p1", "alice")).await.unwrap();
        repo.update_prompt("p1", PromptStatus::Generating, None)
            .await
            .unwrap();
        repo.delete_prompt("p1").await.unwrap();

        let kinds: Vec<_> = [
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
        ]
        .into_iter()
        .map(|c| (c.kind, c.record.status))
        .collect();

        assert_eq!(
            kinds,
            vec![
                (ChangeKind::Put, PromptStatus::Created),
                (ChangeKind::Update, PromptStatus::Generating),
                (ChangeKind::Delete, PromptStatus::Generating),
            ]
        );
    }
}
