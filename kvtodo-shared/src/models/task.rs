/// Task records and the task store
///
/// Tasks form one global list shared by all authenticated users.
///
/// # Storage
///
/// ```text
/// todo:id      counter (INCR)
/// todo:<id>    {"id":1,"title":"Buy milk","done":false}
/// todos        set of all live task ids
/// ```
///
/// Create writes the record and then adds the id to `todos`; the two writes
/// are not transactional. A list may briefly miss a task that is being
/// created, and members whose record is gone are skipped.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kvtodo_shared::models::task::TaskStore;
/// use kvtodo_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tasks = TaskStore::new(Arc::new(MemoryStore::new()));
///
/// let task = tasks.create("Buy milk").await?;
/// tasks.update(task.id, br#"{"done":true}"#).await?;
/// tasks.delete(task.id).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{CoreError, CoreResult};
use crate::store::{keys, StoreHandle};
use serde::{Deserialize, Serialize};

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Id allocated from the `todo:id` counter
    pub id: i64,

    /// Non-empty title
    pub title: String,

    /// Completion flag
    pub done: bool,
}

/// Partial update: only fields that are present are applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub done: Option<bool>,
}

impl TaskPatch {
    /// Parses a patch from a JSON request body
    ///
    /// # Errors
    ///
    /// `ValidationError` if the body is not a JSON object with the expected
    /// field types.
    pub fn from_json(body: &[u8]) -> CoreResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| CoreError::validation(format!("invalid JSON: {}", e)))
    }

    fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(done) = self.done {
            task.done = done;
        }
    }
}

fn validate_title(title: &str) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::validation("title required"));
    }
    Ok(())
}

/// Task store
#[derive(Clone)]
pub struct TaskStore {
    store: StoreHandle,
}

impl TaskStore {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Lists every task in the membership set
    ///
    /// Members whose record has vanished are skipped. Order follows the
    /// store's set enumeration and is unspecified.
    pub async fn list(&self) -> CoreResult<Vec<Task>> {
        let ids = self.store.smembers(keys::TODOS_SET).await?;
        let mut tasks = Vec::with_capacity(ids.len());

        for member in ids {
            let Ok(id) = member.parse::<i64>() else {
                tracing::warn!(member = %member, "Skipping malformed task set member");
                continue;
            };

            match self.store.get(&keys::todo_key(id)).await? {
                Some(data) => tasks.push(serde_json::from_slice::<Task>(&data)?),
                None => {
                    tracing::debug!(task_id = id, "Task record missing, skipping");
                }
            }
        }

        Ok(tasks)
    }

    /// Creates a task with `done = false`
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the title is empty or blank
    /// - `StoreUnavailable` on store failure
    pub async fn create(&self, title: &str) -> CoreResult<Task> {
        validate_title(title)?;

        let id = self.store.incr(keys::TODO_ID_COUNTER).await?;
        let task = Task {
            id,
            title: title.to_string(),
            done: false,
        };

        // Record first, then membership: a list never returns a task that
        // has no record.
        let data = serde_json::to_vec(&task)?;
        self.store.set(&keys::todo_key(id), &data, None).await?;
        self.store.sadd(keys::TODOS_SET, &id.to_string()).await?;

        tracing::info!(task_id = id, "Task created");
        Ok(task)
    }

    /// Loads a single task
    pub async fn get(&self, id: i64) -> CoreResult<Option<Task>> {
        match self.store.get(&keys::todo_key(id)).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Applies a JSON partial update and writes back the merged record
    ///
    /// The task is loaded before the body is parsed, so a missing task is
    /// reported as such whatever the body holds. Concurrent updates to the
    /// same task are last-writer-wins.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the task does not exist
    /// - `ValidationError` if the body is not a valid patch or would blank
    ///   the title
    pub async fn update(&self, id: i64, body: &[u8]) -> CoreResult<Task> {
        let mut task = self
            .get(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("task {} not found", id)))?;

        let patch = TaskPatch::from_json(body)?;
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        patch.apply(&mut task);

        let data = serde_json::to_vec(&task)?;
        self.store.set(&keys::todo_key(id), &data, None).await?;

        tracing::info!(task_id = id, done = task.done, "Task updated");
        Ok(task)
    }

    /// Deletes a task record and its membership entry
    ///
    /// Succeeds whether or not the task existed.
    pub async fn delete(&self, id: i64) -> CoreResult<()> {
        self.store.del(&keys::todo_key(id)).await?;
        self.store.srem(keys::TODOS_SET, &id.to_string()).await?;

        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::failing::FailingStore;
    use crate::store::{KvStore, MemoryStore};
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, TaskStore) {
        let store = Arc::new(MemoryStore::new());
        let tasks = TaskStore::new(store.clone());
        (store, tasks)
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (_, tasks) = setup();

        let created = tasks.create("Buy milk").await.unwrap();
        assert!(!created.done);

        let listed = tasks.list().await.unwrap();
        let matching: Vec<_> = listed.iter().filter(|t| t.title == "Buy milk").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, created.id);
        assert!(!matching[0].done);
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let (store, tasks) = setup();

        assert!(matches!(
            tasks.create("").await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            tasks.create("   ").await,
            Err(CoreError::ValidationError(_))
        ));

        // No id was consumed and nothing was written
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let (_, tasks) = setup();

        let a = tasks.create("a").await.unwrap();
        let b = tasks.create("b").await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_update_done_keeps_title() {
        let (_, tasks) = setup();
        let task = tasks.create("Buy milk").await.unwrap();

        let updated = tasks.update(task.id, br#"{"done":true}"#).await.unwrap();
        assert!(updated.done);
        assert_eq!(updated.title, "Buy milk");

        let listed = tasks.list().await.unwrap();
        assert_eq!(listed, vec![updated]);
    }

    #[tokio::test]
    async fn test_update_title_only() {
        let (_, tasks) = setup();
        let task = tasks.create("Buy milk").await.unwrap();
        tasks.update(task.id, br#"{"done":true}"#).await.unwrap();

        let updated = tasks
            .update(task.id, br#"{"title":"Buy oat milk"}"#)
            .await
            .unwrap();
        assert_eq!(updated.title, "Buy oat milk");
        assert!(updated.done, "omitted field must be unchanged");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (_, tasks) = setup();

        let result = tasks.update(999, b"{}").await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_missing_with_bad_body_is_not_found() {
        let (_, tasks) = setup();

        let result = tasks.update(999, b"{not json").await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_bad_body() {
        let (_, tasks) = setup();
        let task = tasks.create("Buy milk").await.unwrap();

        let result = tasks.update(task.id, br#"{"done":"yes"}"#).await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert!(!tasks.get(task.id).await.unwrap().unwrap().done);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let (_, tasks) = setup();
        let task = tasks.create("Buy milk").await.unwrap();

        let result = tasks.update(task.id, br#"{"title":" "}"#).await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert_eq!(tasks.get(task.id).await.unwrap().unwrap().title, "Buy milk");
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_membership() {
        let (store, tasks) = setup();
        let task = tasks.create("Buy milk").await.unwrap();

        tasks.delete(task.id).await.unwrap();

        assert!(tasks.list().await.unwrap().is_empty());
        assert_eq!(store.get(&keys::todo_key(task.id)).await.unwrap(), None);
        assert!(store.smembers(keys::TODOS_SET).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_, tasks) = setup();

        tasks.delete(12345).await.unwrap();
        tasks.delete(12345).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_skips_vanished_records() {
        let (store, tasks) = setup();
        let kept = tasks.create("kept").await.unwrap();
        let gone = tasks.create("gone").await.unwrap();

        // Record removed behind the set's back
        store.del(&keys::todo_key(gone.id)).await.unwrap();

        assert_eq!(tasks.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let tasks = TaskStore::new(Arc::new(FailingStore));

        assert!(matches!(
            tasks.list().await,
            Err(CoreError::StoreUnavailable(_))
        ));
        assert!(matches!(
            tasks.create("Buy milk").await,
            Err(CoreError::StoreUnavailable(_))
        ));
        assert!(matches!(
            tasks.update(1, br#"{"done":true}"#).await,
            Err(CoreError::StoreUnavailable(_))
        ));
        assert!(matches!(
            tasks.delete(1).await,
            Err(CoreError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_patch_from_json() {
        let patch = TaskPatch::from_json(br#"{"done":true}"#).unwrap();
        assert_eq!(patch.done, Some(true));
        assert_eq!(patch.title, None);

        assert!(matches!(
            TaskPatch::from_json(b"{not json"),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            TaskPatch::from_json(br#"{"done":"yes"}"#),
            Err(CoreError::ValidationError(_))
        ));
    }
}
