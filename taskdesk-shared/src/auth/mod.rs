/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Token issuer and verifier (HS256, 5 minute lifetime)
/// - [`identity`]: Bearer header parsing and the authenticated caller
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::auth::password::{hash_password, verify_password};
/// use taskdesk_shared::auth::jwt::{TokenIssuer, TokenVerifier};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let secret = "your-secret-key-at-least-32-bytes";
/// let issued = TokenIssuer::new(secret).issue(Uuid::new_v4())?;
/// let claims = TokenVerifier::new(secret).verify(&issued.token)?;
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod jwt;
pub mod password;

pub use identity::{authenticate, AuthError, AuthenticatedIdentity};
pub use jwt::{Claims, IssuedToken, JwtError, TokenIssuer, TokenVerifier};
pub use password::{hash_password, verify_password, PasswordError};
