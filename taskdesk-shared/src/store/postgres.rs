/// PostgreSQL store
///
/// Ids and timestamps are generated in Rust before insert so both backends
/// produce identical records. Ownership checks are part of each `WHERE` clause,
/// never a read followed by a write.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CommentStore, Store, StoreResult, TaskStore, UserStore};
use crate::db::pool;
use crate::models::{Comment, NewComment, NewTask, NewUser, Task, TaskChanges, TaskFilter, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

const TASK_COLUMNS: &str = "id, title, description, assigned_to, status, priority, \
                            created_by, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, task_id, author_id, text, created_at";

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let user = user.into_user();

        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let task = task.into_task();

        let created = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (id, title, description, assigned_to, status, priority,
                               created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.assigned_to)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.created_by)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_task_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND created_by = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE TRUE");
        let mut bind_count = 0;

        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        if filter.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND priority = ${}", bind_count));
        }
        if filter.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND assigned_to = ${}", bind_count));
        }
        if filter.created_by.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND created_by = ${}", bind_count));
        }
        if filter.owner.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND created_by = ${}", bind_count));
        }

        query.push_str(" ORDER BY created_at DESC, id ASC");

        let mut q = sqlx::query_as::<_, Task>(&query);

        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(priority) = filter.priority {
            q = q.bind(priority);
        }
        if let Some(assigned_to) = filter.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(created_by) = filter.created_by {
            q = q.bind(created_by);
        }
        if let Some(owner) = filter.owner {
            q = q.bind(owner);
        }

        let tasks = q.fetch_all(&self.pool).await?;

        Ok(tasks)
    }

    async fn update_task_for_owner(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TaskChanges,
    ) -> StoreResult<Option<Task>> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW(), status = $3");

        if changes.priority.is_some() {
            query.push_str(", priority = $4");
        }

        query.push_str(&format!(
            " WHERE id = $1 AND created_by = $2 RETURNING {TASK_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner)
            .bind(changes.status);

        if let Some(priority) = changes.priority {
            q = q.bind(priority);
        }

        let task = q.fetch_optional(&self.pool).await?;

        Ok(task)
    }

    async fn delete_task_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let comment = comment.into_comment();

        let created = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (id, task_id, author_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(comment.id)
        .bind(comment.task_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE task_id = $1 \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn delete_comment_for_author(&self, id: Uuid, author: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }
}
