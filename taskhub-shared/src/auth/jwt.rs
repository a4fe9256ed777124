/// Bearer token generation and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) and carry the user's id,
/// email, and role set so the HTTP layer can rebuild the acting identity
/// without a database lookup.
///
/// # Security
///
/// - **Algorithm**: HS256
/// - **Expiration**: configurable, default 7 days
/// - **Validation**: signature, expiration, not-before, and issuer checks
/// - **Secret**: at least 32 bytes, supplied via configuration
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskhub_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let claims = Claims::new(user_id, "ada@example.com".to_string(), vec![Role::Member]);
///
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Token issuer embedded and checked on every token
const ISSUER: &str = "taskhub";

/// Error type for token operations
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
}

/// Token claims
///
/// # Standard claims
///
/// - `sub`: subject (user ID)
/// - `iss`: issuer, always "taskhub"
/// - `iat` / `exp` / `nbf`: issued-at, expiration, not-before timestamps
///
/// # Custom claims
///
/// - `email`: account email at issue time
/// - `roles`: role set at issue time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Account email (custom claim)
    pub email: String,

    /// Role set (custom claim)
    pub roles: Vec<Role>,
}

impl Claims {
    /// Default token lifetime
    pub fn default_expiration() -> Duration {
        Duration::days(7)
    }

    /// Creates claims with the default lifetime
    pub fn new(user_id: Uuid, email: String, roles: Vec<Role>) -> Self {
        Self::with_expiration(user_id, email, roles, Self::default_expiration())
    }

    /// Creates claims with a custom lifetime
    pub fn with_expiration(user_id: Uuid, email: String, roles: Vec<Role>, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            email,
            roles,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, expiration, not-before, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens and
/// `JwtError::ValidationError` for every other rejection
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
