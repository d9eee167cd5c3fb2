/// User endpoints
///
/// - `GET /user/me` - The authenticated caller's profile
/// - `GET /users` - Every registered user
///
/// Both return [`UserProfile`] views; password hashes never leave the store.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use taskdesk_shared::{auth::AuthenticatedIdentity, models::UserProfile};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

/// Returns the caller's profile
///
/// A valid token whose user no longer exists yields 404.
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> ApiResult<Json<MeResponse>> {
    let user = state
        .store
        .find_user_by_id(identity.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %identity.user_id, "Token subject has no user record");
            ApiError::NotFound("User not found".to_string())
        })?;

    Ok(Json(MeResponse { user: user.into() }))
}

/// Lists all users, oldest first
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = state
        .store
        .list_users()
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();

    Ok(Json(UsersResponse { users }))
}
