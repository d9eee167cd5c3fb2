/// JWT issuance and verification
///
/// This module provides the two halves of bearer-token authentication:
///
/// - [`TokenIssuer`] mints a signed, short-lived token for a user that has just
///   proven their credentials.
/// - [`TokenVerifier`] checks an inbound token and yields its [`Claims`].
///
/// Both are constructed from the same shared secret at process start and carried
/// in application state; nothing here reads global configuration.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 5 minutes by default, no refresh tokens
/// - **Validation**: Signature, expiration, not-before and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::jwt::{TokenIssuer, TokenVerifier};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes";
/// let issuer = TokenIssuer::new(secret);
/// let verifier = TokenVerifier::new(secret);
///
/// let user_id = Uuid::new_v4();
/// let issued = issuer.issue(user_id)?;
///
/// let claims = verifier.verify(&issued.token)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped into every token
pub const ISSUER: &str = "taskdesk";

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 5 * 60;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskdesk")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "taskdesk"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `user_id` that expire after `expires_in`
    ///
    /// # Example
    ///
    /// ```
    /// use taskdesk_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::with_expiration(Uuid::new_v4(), Duration::minutes(5));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiration as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// A freshly minted token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Mints signed identity tokens
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Creates an issuer with the default 5 minute lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS))
    }

    /// Creates an issuer with a custom token lifetime
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for a user whose credentials were just verified
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if signing fails
    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, JwtError> {
        let claims = Claims::with_expiration(user_id, self.ttl);
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Signs arbitrary claims with HS256
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Validates inbound tokens
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier for tokens signed with `secret`
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validates a JWT token and extracts claims
    ///
    /// Verifies:
    /// - Signature is valid
    /// - Token hasn't expired
    /// - Issuer is "taskdesk"
    /// - Token is not used before nbf time
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
                    expected: ISSUER.to_string(),
                },
                _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_default_lifetime_is_five_minutes() {
        let issuer = TokenIssuer::new(SECRET);
        assert_eq!(issuer.ttl(), Duration::minutes(5));
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();
        let issuer = TokenIssuer::new(SECRET);
        let verifier = TokenVerifier::new(SECRET);

        let issued = issuer.issue(user_id).expect("Should issue token");
        let claims = verifier.verify(&issued.token).expect("Should verify token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issued = TokenIssuer::new(SECRET).issue(Uuid::new_v4()).unwrap();

        let result = TokenVerifier::new("another-secret-key-at-least-32-bytes").verify(&issued.token);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let issuer = TokenIssuer::new(SECRET);

        // Expired an hour ago, well past the default leeway
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = issuer.sign(&claims).unwrap();
        let result = TokenVerifier::new(SECRET).verify(&token);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_verify_foreign_issuer() {
        let mut claims = Claims::with_expiration(Uuid::new_v4(), Duration::minutes(5));
        claims.iss = "someone-else".to_string();

        let token = TokenIssuer::new(SECRET).sign(&claims).unwrap();
        let result = TokenVerifier::new(SECRET).verify(&token);

        assert!(matches!(result, Err(JwtError::InvalidIssuer { .. })));
    }

    #[test]
    fn test_verify_garbage() {
        let result = TokenVerifier::new(SECRET).verify("not.a.jwt");
        assert!(result.is_err());
    }
}
