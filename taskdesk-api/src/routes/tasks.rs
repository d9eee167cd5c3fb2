/// Task endpoints
///
/// # Endpoints
///
/// - `POST   /tasks` - Create a task owned by the caller
/// - `GET    /tasks` - List tasks with optional equality filters
/// - `GET    /tasks/:id` - Fetch one of the caller's tasks
/// - `PUT    /tasks/:id` - Change status (and optionally priority)
/// - `DELETE /tasks/:id` - Delete one of the caller's tasks
///
/// # Ownership
///
/// Single-task operations match on id and creator together. A task owned by
/// someone else answers 404 exactly like a missing one. Assignment grants no
/// access.
///
/// Listing follows `TASK_LIST_SCOPE`: `owned` adds the caller as an implicit
/// creator filter, `all` applies only the client's filters.

use crate::{
    app::AppState,
    config::TaskListScope,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::non_blank,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    auth::AuthenticatedIdentity,
    models::{NewTask, Task, TaskChanges, TaskFilter, TaskPriority, TaskStatus},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(
        custom(function = "non_blank", message = "Title is required"),
        length(max = 255, message = "Title must be at most 255 characters")
    )]
    pub title: String,

    /// Absent or `null` is stored as empty
    pub description: Option<String>,

    /// Defaults to the caller
    pub assigned_to: Option<Uuid>,

    /// Defaults to `pending`
    pub status: Option<String>,

    /// Defaults to `medium`
    pub priority: Option<String>,
}

/// Update task request
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub status: Option<String>,

    /// Left unchanged when absent
    pub priority: Option<String>,
}

/// Update task response
#[derive(Debug, Serialize)]
pub struct UpdateTaskResponse {
    pub message: String,
    pub id: Uuid,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query string for `GET /tasks`
///
/// Empty values are treated as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
}

impl ListTasksQuery {
    /// Parses the query into a store filter, without ownership scope
    pub fn into_filter(self) -> ApiResult<TaskFilter> {
        Ok(TaskFilter {
            status: present(self.status)
                .map(|s| s.parse::<TaskStatus>())
                .transpose()?,
            priority: present(self.priority)
                .map(|s| s.parse::<TaskPriority>())
                .transpose()?,
            assigned_to: present(self.assigned_to)
                .map(|s| parse_user_id("assignedTo", &s))
                .transpose()?,
            created_by: present(self.created_by)
                .map(|s| parse_user_id("createdBy", &s))
                .transpose()?,
            owner: None,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_user_id(field: &str, value: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}: '{}' is not a valid id", field, value)))
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Creates a task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
///
/// { "title": "Ship", "assignedTo": "uuid", "priority": "high" }
/// ```
///
/// # Response (201)
///
/// The stored task, including server-assigned `id`, `createdBy`, `createdAt`
/// and `updatedAt`.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let status = req
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?
        .unwrap_or_default();
    let priority = req
        .priority
        .as_deref()
        .map(str::parse::<TaskPriority>)
        .transpose()?
        .unwrap_or_default();

    let task = state
        .store
        .create_task(NewTask {
            title: req.title.trim().to_string(),
            description: req.description.unwrap_or_default(),
            assigned_to: req.assigned_to.unwrap_or(identity.user_id),
            status,
            priority,
            created_by: identity.user_id,
        })
        .await?;

    tracing::info!(
        task_id = %task.id,
        user_id = %identity.user_id,
        assigned_to = %task.assigned_to,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists tasks
///
/// # Query
///
/// `status`, `priority`, `assignedTo`, `createdBy`; all optional, all
/// equality matches. An unknown status or priority is a 400.
///
/// # Response
///
/// A JSON array, newest first; `[]` when nothing matches.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let mut filter = query.into_filter()?;

    if state.config.task_list_scope == TaskListScope::Owned {
        filter.owner = Some(identity.user_id);
    }

    let tasks = state.store.list_tasks(&filter).await?;

    tracing::debug!(
        user_id = %identity.user_id,
        count = tasks.len(),
        "Listed tasks"
    );

    Ok(Json(tasks))
}

/// Fetches one of the caller's tasks
pub async fn get_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state
        .store
        .find_task_for_owner(id, identity.user_id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Updates a task's status and, optionally, its priority
///
/// # Endpoint
///
/// ```text
/// PUT /tasks/:id
///
/// { "status": "in_progress", "priority": "high" }
/// ```
///
/// # Response
///
/// ```json
/// { "message": "Task updated successfully", "id": "uuid", "status": "in_progress", "priority": "high" }
/// ```
///
/// Any status may follow any other.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<UpdateTaskResponse>> {
    let status = req
        .status
        .as_deref()
        .ok_or_else(|| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "status".to_string(),
                message: "Status is required".to_string(),
            }])
        })?
        .parse::<TaskStatus>()?;
    let priority = req
        .priority
        .as_deref()
        .map(str::parse::<TaskPriority>)
        .transpose()?;

    let task = state
        .store
        .update_task_for_owner(id, identity.user_id, TaskChanges { status, priority })
        .await?
        .ok_or_else(|| {
            tracing::debug!(task_id = %id, user_id = %identity.user_id, "Update matched no owned task");
            task_not_found()
        })?;

    tracing::info!(task_id = %task.id, status = %task.status, priority = %task.priority, "Task updated");

    Ok(Json(UpdateTaskResponse {
        message: "Task updated successfully".to_string(),
        id: task.id,
        status: task.status,
        priority: task.priority,
    }))
}

/// Deletes one of the caller's tasks
///
/// Comments on the task are left in place.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.store.delete_task_for_owner(id, identity.user_id).await? {
        tracing::debug!(task_id = %id, user_id = %identity.user_id, "Delete matched no owned task");
        return Err(task_not_found());
    }

    tracing::info!(task_id = %id, user_id = %identity.user_id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_unfiltered() {
        let filter = ListTasksQuery {
            status: Some(String::new()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter, TaskFilter::default());
    }

    #[test]
    fn test_query_parses_filters() {
        let user = Uuid::new_v4();
        let filter = ListTasksQuery {
            status: Some("in_progress".to_string()),
            priority: Some("high".to_string()),
            assigned_to: Some(user.to_string()),
            created_by: None,
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.status, Some(TaskStatus::InProgress));
        assert_eq!(filter.priority, Some(TaskPriority::High));
        assert_eq!(filter.assigned_to, Some(user));
        assert_eq!(filter.owner, None);
    }

    #[test]
    fn test_query_rejects_unknown_values() {
        let err = ListTasksQuery {
            status: Some("urgent".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let err = ListTasksQuery {
            created_by: Some("not-a-uuid".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
