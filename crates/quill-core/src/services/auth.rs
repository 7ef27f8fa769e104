//! Registration, login and token authentication.

use std::sync::Arc;

use crate::domain::{User, mask_email, normalize_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// A user together with a freshly issued session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Stateless authentication flow over the credential store and token service.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Lifetime of the tokens this service issues.
    pub fn token_lifetime_seconds(&self) -> i64 {
        self.tokens.expiration_seconds()
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, DomainError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation("All fields are required".to_string()));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::info!(user_email = %mask_email(&email), "Registration rejected: email taken");
            return Err(DomainError::DuplicateEmail);
        }

        let password_hash = self
            .passwords
            .hash(password)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        // A concurrent registration may still win the race; the store decides.
        let user = match self
            .users
            .create(User::new(name.to_string(), email, password_hash))
            .await
        {
            Ok(user) => user,
            Err(RepoError::Constraint(_)) => return Err(DomainError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, "User registered");
        self.session_for(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            self.passwords.verify_dummy(password).await;
            tracing::info!(user_email = %mask_email(&email), "Login failed: unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::info!(user_id = %user.id, "Login failed: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "Login successful");
        self.session_for(user)
    }

    /// Resolve a bearer token to a user that still exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let claims = self
            .tokens
            .validate_token(token)
            .map_err(DomainError::Unauthenticated)?;

        self.users
            .find_by_id(claims.user_id)
            .await?
            .ok_or(DomainError::Unauthenticated(AuthError::UnknownUser))
    }

    fn session_for(&self, user: User) -> Result<AuthSession, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id, &user.email)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(AuthSession { user, token })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::ports::TokenClaims;

    /// Counts verifications, real and dummy alike.
    #[derive(Default)]
    struct PlainHasher {
        verifications: AtomicUsize,
    }

    #[async_trait]
    impl PasswordService for PlainHasher {
        async fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{password}"))
        }

        async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            Ok(hash == format!("hashed:{password}"))
        }

        async fn verify_dummy(&self, _password: &str) {
            self.verifications.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Tokens look like `<user id>|<email>`; `expired|...` and garbage fail.
    struct PipeTokens;

    impl TokenService for PipeTokens {
        fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
            Ok(format!("{user_id}|{email}"))
        }

        fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
            let (id, email) = token
                .split_once('|')
                .ok_or_else(|| AuthError::InvalidToken("malformed".into()))?;
            if id == "expired" {
                return Err(AuthError::TokenExpired);
            }
            let user_id =
                Uuid::parse_str(id).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
            Ok(TokenClaims {
                user_id,
                email: email.to_string(),
                issued_at: Utc::now(),
                expires_at: Utc::now(),
            })
        }

        fn expiration_seconds(&self) -> i64 {
            60
        }
    }

    #[derive(Default)]
    struct VecUsers(Mutex<Vec<User>>);

    #[async_trait]
    impl UserRepository for VecUsers {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
            Ok(self.0.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(self.0.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn create(&self, user: User) -> Result<User, RepoError> {
            let mut users = self.0.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(RepoError::Constraint("email".into()));
            }
            users.push(user.clone());
            Ok(user)
        }
    }

    fn service_with(hasher: Arc<PlainHasher>) -> AuthService {
        AuthService::new(Arc::new(VecUsers::default()), hasher, Arc::new(PipeTokens))
    }

    fn service() -> AuthService {
        service_with(Arc::new(PlainHasher::default()))
    }

    #[tokio::test]
    async fn test_register_normalizes_and_hashes() {
        let auth = service();

        let session = auth.register(" Ann ", " Ann@X.com ", "secret1").await.unwrap();

        assert_eq!(session.user.name, "Ann");
        assert_eq!(session.user.email, "ann@x.com");
        assert_ne!(session.user.password_hash, "secret1");
        assert_eq!(session.token, format!("{}|ann@x.com", session.user.id));
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let auth = service();

        for (name, email, password) in [("", "a@x.com", "pw"), ("A", "  ", "pw"), ("A", "a@x.com", "")] {
            let err = auth.register(name, email, password).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email_differing_in_case() {
        let auth = service();
        auth.register("Ann", "ann@x.com", "secret1").await.unwrap();

        let err = auth.register("Other", "  ANN@x.com", "pw").await.unwrap_err();

        assert!(matches!(err, DomainError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.register("Ann", "ann@x.com", "secret1").await.unwrap();

        let wrong_password = auth.login("ann@x.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("bob@x.com", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert!(matches!(unknown_email, DomainError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_unknown_email_costs_one_verification() {
        let hasher = Arc::new(PlainHasher::default());
        let auth = service_with(hasher.clone());
        auth.register("Ann", "ann@x.com", "secret1").await.unwrap();

        auth.login("ann@x.com", "nope").await.unwrap_err();
        assert_eq!(hasher.verifications.load(Ordering::SeqCst), 1);

        auth.login("bob@x.com", "nope").await.unwrap_err();
        assert_eq!(hasher.verifications.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let auth = service();
        let registered = auth.register("Ann", "ann@x.com", "secret1").await.unwrap();

        let session = auth.login("ANN@x.com", "secret1").await.unwrap();
        let user = auth.authenticate(&session.token).await.unwrap();

        assert_eq!(user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_user_and_bad_tokens() {
        let auth = service();

        let ghost = auth
            .authenticate(&format!("{}|ghost@x.com", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(ghost, DomainError::Unauthenticated(AuthError::UnknownUser)));

        let expired = auth.authenticate("expired|a@x.com").await.unwrap_err();
        assert!(matches!(expired, DomainError::Unauthenticated(AuthError::TokenExpired)));

        let garbage = auth.authenticate("garbage").await.unwrap_err();
        assert!(matches!(garbage, DomainError::Unauthenticated(AuthError::InvalidToken(_))));
    }
}
