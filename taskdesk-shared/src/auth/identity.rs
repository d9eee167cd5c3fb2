/// Caller identity extracted from a bearer token
///
/// Protected requests pass through [`authenticate`] before reaching any
/// handler. On success the resulting [`AuthenticatedIdentity`] is placed in the
/// request extensions and handed to every handler that reads or mutates
/// owned records. Handlers never derive the caller from the request body.
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::identity::{authenticate, AuthError};
/// use taskdesk_shared::auth::jwt::{TokenIssuer, TokenVerifier};
/// use uuid::Uuid;
///
/// let secret = "your-secret-key-at-least-32-bytes";
/// let user_id = Uuid::new_v4();
/// let token = TokenIssuer::new(secret).issue(user_id).unwrap().token;
/// let header = format!("Bearer {}", token);
///
/// let verifier = TokenVerifier::new(secret);
/// let identity = authenticate(Some(&header), &verifier).unwrap();
/// assert_eq!(identity.user_id, user_id);
///
/// assert!(matches!(authenticate(None, &verifier), Err(AuthError::MissingCredentials)));
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{JwtError, TokenVerifier};

/// The verified caller of a protected request
///
/// The user's existence is not re-checked per request; the token's subject is
/// trusted until the token expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// Authenticated user ID (token subject)
    pub user_id: Uuid,
}

impl AuthenticatedIdentity {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    /// Whether this caller is the owner recorded on a resource
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id
    }
}

/// Error type for bearer authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Authorization header required")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Bearer token required")]
    InvalidFormat,

    /// Token rejected by the verifier
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

/// Validates an `Authorization` header value and returns the caller
///
/// # Errors
///
/// - `MissingCredentials` if the header is absent
/// - `InvalidFormat` if it is not `Bearer <token>` with a non-empty token
/// - `InvalidToken` if the signature, issuer or expiry check fails
pub fn authenticate(
    authorization: Option<&str>,
    verifier: &TokenVerifier,
) -> Result<AuthenticatedIdentity, AuthError> {
    let header = authorization.ok_or(AuthError::MissingCredentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    let claims = verifier.verify(token)?;

    Ok(AuthenticatedIdentity::new(claims.sub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{Claims, TokenIssuer};
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_authenticate_valid_bearer() {
        let user_id = Uuid::new_v4();
        let token = TokenIssuer::new(SECRET).issue(user_id).unwrap().token;

        let identity =
            authenticate(Some(&format!("Bearer {}", token)), &TokenVerifier::new(SECRET)).unwrap();

        assert_eq!(identity, AuthenticatedIdentity::new(user_id));
        assert!(identity.owns(user_id));
        assert!(!identity.owns(Uuid::new_v4()));
    }

    #[test]
    fn test_authenticate_rejects_malformed_headers() {
        let verifier = TokenVerifier::new(SECRET);

        assert!(matches!(
            authenticate(None, &verifier),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            authenticate(Some("Token abc"), &verifier),
            Err(AuthError::InvalidFormat)
        ));
        assert!(matches!(
            authenticate(Some("Bearer "), &verifier),
            Err(AuthError::InvalidFormat)
        ));
        assert!(matches!(
            authenticate(Some("Bearer abc.def.ghi"), &verifier),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_authenticate_rejects_expired_token() {
        let issuer = TokenIssuer::new(SECRET);
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-3600));
        let token = issuer.sign(&claims).unwrap();

        let result = authenticate(Some(&format!("Bearer {}", token)), &TokenVerifier::new(SECRET));
        assert!(matches!(
            result,
            Err(AuthError::InvalidToken(JwtError::Expired))
        ));
    }
}
