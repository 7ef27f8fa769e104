//! Authentication ports: token issuance and password hashing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Token service trait for stateless session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a signed token for a user.
    fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Validate a token and decode its claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service. Implementations keep slow hashing off the
/// async executor.
#[async_trait]
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    async fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// Spend the cost of one `verify` when there is no stored hash to check,
    /// so unknown accounts answer as slowly as wrong passwords.
    async fn verify_dummy(&self, password: &str);
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Token subject no longer exists")]
    UnknownUser,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
