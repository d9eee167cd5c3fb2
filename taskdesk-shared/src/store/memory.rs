/// In-memory store
///
/// Keeps every collection in process memory behind one `tokio::sync::RwLock`.
/// Data is lost on restart. Used by the test suites and by
/// `STORAGE_BACKEND=memory` for local development without PostgreSQL.
///
/// Ordering matches [`super::postgres::PgStore`]: users and comments oldest
/// first, tasks newest first.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CommentStore, Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{Comment, NewComment, NewTask, NewUser, Task, TaskChanges, TaskFilter, User};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    tasks: HashMap<Uuid, Task>,
    comments: HashMap<Uuid, Comment>,
}

/// Store backed by hash maps
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut guard = self.inner.write().await;

        // Checked under the write lock, mirroring the unique index
        if guard.users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict(
                "Constraint violation: users_email_key".to_string(),
            ));
        }

        let user = user.into_user();
        guard.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self.inner.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let task = task.into_task();
        self.inner.write().await.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>> {
        Ok(self
            .inner
            .read()
            .await
            .tasks
            .get(&id)
            .filter(|task| task.created_by == owner)
            .cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn update_task_for_owner(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TaskChanges,
    ) -> StoreResult<Option<Task>> {
        let mut guard = self.inner.write().await;

        match guard.tasks.get_mut(&id) {
            Some(task) if task.created_by == owner => {
                changes.apply(task);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut guard = self.inner.write().await;

        let owned = guard
            .tasks
            .get(&id)
            .map_or(false, |task| task.created_by == owner);
        if owned {
            guard.tasks.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let comment = comment.into_comment();
        self.inner
            .write()
            .await
            .comments
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .inner
            .read()
            .await
            .comments
            .values()
            .filter(|comment| comment.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn delete_comment_for_author(&self, id: Uuid, author: Uuid) -> StoreResult<bool> {
        let mut guard = self.inner.write().await;

        let authored = guard
            .comments
            .get(&id)
            .map_or(false, |comment| comment.author_id == author);
        if authored {
            guard.comments.remove(&id);
        }
        Ok(authored)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
