/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: Current user and user directory
/// - `tasks`: Task CRUD with ownership scoping
/// - `comments`: Comments on owned tasks

pub mod auth;
pub mod comments;
pub mod health;
pub mod tasks;
pub mod users;

use crate::error::ApiError;
use axum::http::Uri;
use validator::ValidationError;

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Rejects empty and whitespace-only strings
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert!(non_blank("Ship").is_ok());
        assert!(non_blank("").is_err());
        assert!(non_blank("  \t").is_err());
    }
}
