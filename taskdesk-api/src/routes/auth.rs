/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Exchange credentials for a bearer token
///
/// Passwords are hashed with Argon2id on a blocking thread; the plaintext is
/// never stored or logged.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::non_blank,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    auth::password,
    models::{NewUser, UserProfile},
    store::StoreError,
};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[serde(default)]
    #[validate(
        custom(function = "non_blank", message = "Name is required"),
        length(max = 255, message = "Name must be at most 255 characters")
    )]
    pub name: String,

    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "Password is required"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Registration endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "message": "User created successfully",
///   "user": { "id": "uuid", "name": "Ada Lovelace", "email": "ada@example.com", "createdAt": "..." }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    // Lookup first for a clean 409; the unique index catches the race
    if state.store.find_user_by_email(&req.email).await?.is_some() {
        tracing::debug!(email = %req.email, "Registration rejected: email taken");
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_on_blocking_pool(req.password).await?;

    let user = state
        .store
        .create_user(NewUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
        }),
    ))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "expiresAt": "2025-01-01T00:05:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Login rejected: unknown email");
            ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
        })?;

    let valid = verify_on_blocking_pool(req.password, user.password_hash).await?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let issued = state.issuer.issue(user.id)?;

    tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "User logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

async fn hash_on_blocking_pool(plaintext: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| ApiError::InternalError(format!("Password hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

async fn verify_on_blocking_pool(plaintext: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Password verification task failed: {}", e)))?
        .map_err(ApiError::from)
}
