/// Comment endpoints
///
/// - `POST   /tasks/:id/comments` - Comment on one of the caller's tasks
/// - `GET    /tasks/:id/comments` - List comments on one of the caller's tasks
/// - `DELETE /comments/:comment_id` - Delete a comment the caller wrote
///
/// Commenting and reading comments both require owning the task. Deleting
/// requires authorship only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{non_blank, tasks::MessageResponse},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use taskdesk_shared::{
    auth::AuthenticatedIdentity,
    models::{Comment, NewComment},
};
use uuid::Uuid;
use validator::Validate;

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "Text is required"))]
    pub text: String,
}

/// Confirms the caller owns `task_id`
async fn ensure_task_owned(
    state: &AppState,
    task_id: Uuid,
    identity: &AuthenticatedIdentity,
) -> ApiResult<()> {
    match state.store.find_task_for_owner(task_id, identity.user_id).await? {
        Some(_) => Ok(()),
        None => {
            tracing::debug!(task_id = %task_id, user_id = %identity.user_id, "Comment access to unowned task");
            Err(ApiError::NotFound(
                "Task not found or no permission".to_string(),
            ))
        }
    }
}

/// Adds a comment to one of the caller's tasks
///
/// # Endpoint
///
/// ```text
/// POST /tasks/:id/comments
///
/// { "text": "Blocked on review" }
/// ```
///
/// # Response (201)
///
/// The stored comment.
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate()?;
    ensure_task_owned(&state, task_id, &identity).await?;

    let comment = state
        .store
        .create_comment(NewComment {
            task_id,
            author_id: identity.user_id,
            text: req.text,
        })
        .await?;

    tracing::info!(comment_id = %comment.id, task_id = %task_id, "Comment created");

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Lists comments on one of the caller's tasks, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    ensure_task_owned(&state, task_id, &identity).await?;

    let comments = state.store.list_comments_for_task(task_id).await?;

    Ok(Json(comments))
}

/// Deletes a comment written by the caller
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ApiPath(comment_id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state
        .store
        .delete_comment_for_author(comment_id, identity.user_id)
        .await?
    {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    tracing::info!(comment_id = %comment_id, user_id = %identity.user_id, "Comment deleted");

    Ok(Json(MessageResponse {
        message: "Comment deleted successfully".to_string(),
    }))
}
