//! Argon2 password hashing implementation.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

use quill_core::ports::{AuthError, PasswordService};

/// Valid PHC string with the default Argon2id parameters. It is the hash of
/// no known password.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$8UDjXynwf+8SIEyYBdx69Q$ZaP81ihAwwtK6Ljolm74lT12htqNLpypzRMj5S5ywVY";

/// Argon2id password service. Each hash gets its own random salt and is
/// stored as a PHC string. Hashing runs on tokio's blocking pool.
#[derive(Clone)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, AuthError>
    where
        F: FnOnce(Argon2<'static>) -> Result<T, AuthError> + Send + 'static,
        T: Send + 'static,
    {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || work(argon2))
            .await
            .map_err(|e| AuthError::HashingError(e.to_string()))?
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordService for Argon2PasswordService {
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();

        self.blocking(move |argon2| {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| AuthError::HashingError(e.to_string()))
        })
        .await
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        self.blocking(move |argon2| {
            let parsed_hash =
                PasswordHash::new(&hash).map_err(|e| AuthError::HashingError(e.to_string()))?;
            Ok(argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
    }

    async fn verify_dummy(&self, password: &str) {
        if let Err(e) = self.verify(password, DUMMY_HASH).await {
            tracing::error!(error = %e, "Dummy password verification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let service = Argon2PasswordService::new();
        let password = "secret1";

        let hash = service.hash(password).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify(password, &hash).await.unwrap());
        assert!(!service.verify("wrong_password", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let service = Argon2PasswordService::new();

        let first = service.hash("secret1").await.unwrap();
        let second = service.hash("secret1").await.unwrap();

        assert_ne!(first, second);
        assert!(service.verify("secret1", &second).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        let service = Argon2PasswordService::new();

        assert!(matches!(
            service.verify("secret1", "plaintext").await,
            Err(AuthError::HashingError(_))
        ));
    }

    #[test]
    fn test_dummy_hash_uses_default_cost() {
        let parsed = PasswordHash::new(DUMMY_HASH).unwrap();
        let params = argon2::Params::try_from(&parsed).unwrap();

        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());
        assert_eq!(params.m_cost(), argon2::Params::DEFAULT_M_COST);
        assert_eq!(params.t_cost(), argon2::Params::DEFAULT_T_COST);
        assert_eq!(params.p_cost(), argon2::Params::DEFAULT_P_COST);
    }

    #[tokio::test]
    async fn test_dummy_verify_rejects_everything() {
        let service = Argon2PasswordService::new();

        assert!(!service.verify("secret1", DUMMY_HASH).await.unwrap());
        service.verify_dummy("secret1").await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_leaves_the_executor_free() {
        let service = Argon2PasswordService::new();
        let ticks = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    tokio::task::yield_now().await;
                }
            })
        };

        service.hash("secret1").await.unwrap();
        ticker.abort();

        // A hash computed inline on this single-threaded runtime would starve
        // the ticker completely.
        assert!(ticks.load(std::sync::atomic::Ordering::Relaxed) > 0);
    }
}
