/// Entity stores
///
/// Users, tasks and comments are persisted through three narrow traits, one per
/// collection, bundled into [`Store`]. Handlers hold an `Arc<dyn Store>` and
/// never see which backend sits behind it.
///
/// # Backends
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::MemoryStore`]: in-process maps (development and tests)
///
/// # Ownership scoping
///
/// Every mutation of an owned record takes the caller's id and matches on
/// `id AND owner` in a single operation. A record that exists but belongs to
/// someone else is reported exactly like a missing one (`None` / `false`).
///
/// # Consistency
///
/// Each call is a single-document operation. Nothing spans collections: a
/// comment may reference a deleted task and a task may be assigned to a user id
/// that does not exist.
///
/// # Example
///
/// ```
/// use taskdesk_shared::models::{NewTask, TaskPriority, TaskStatus};
/// use taskdesk_shared::store::{memory::MemoryStore, TaskStore};
/// use uuid::Uuid;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let owner = Uuid::new_v4();
///
/// let task = store
///     .create_task(NewTask {
///         title: "Ship".to_string(),
///         description: String::new(),
///         assigned_to: owner,
///         status: TaskStatus::Pending,
///         priority: TaskPriority::Medium,
///         created_by: owner,
///     })
///     .await?;
///
/// assert!(store.find_task_for_owner(task.id, owner).await?.is_some());
/// assert!(store.find_task_for_owner(task.id, Uuid::new_v4()).await?.is_none());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Comment, NewComment, NewTask, NewUser, Task, TaskChanges, TaskFilter, User};

pub mod memory;
pub mod postgres;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::Conflict(format!("Constraint violation: {}", constraint));
            }
        }
        StoreError::Database(err)
    }
}

/// Persistence for registered users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user
    ///
    /// Fails with `StoreError::Conflict` if the email is taken. Callers check
    /// [`find_user_by_email`](UserStore::find_user_by_email) first; this is the
    /// backstop for a concurrent registration that slips between the two.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// All users, oldest first
    async fn list_users(&self) -> StoreResult<Vec<User>>;
}

/// Persistence for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, task: NewTask) -> StoreResult<Task>;

    /// Finds a task only if `owner` created it
    async fn find_task_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>>;

    /// Tasks matching every populated filter, newest first
    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Applies `changes` only if `owner` created the task
    async fn update_task_for_owner(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TaskChanges,
    ) -> StoreResult<Option<Task>>;

    /// Deletes a task only if `owner` created it; true if a row went away
    async fn delete_task_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;
}

/// Persistence for comments
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment>;

    /// Comments on a task, oldest first
    async fn list_comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// Deletes a comment only if `author` wrote it; true if a row went away
    async fn delete_comment_for_author(&self, id: Uuid, author: Uuid) -> StoreResult<bool>;
}

/// A complete backend
#[async_trait]
pub trait Store: UserStore + TaskStore + CommentStore {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Checks the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
