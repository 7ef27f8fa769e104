//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{User, mask_email};
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

#[derive(Default)]
struct UserStore {
    by_id: HashMap<Uuid, User>,
    /// Normalized email -> user id.
    by_email: HashMap<String, Uuid>,
}

/// User repository used when no database is configured.
pub struct InMemoryUserRepository {
    store: RwLock<UserStore>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(UserStore::default()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.by_id.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let store = self.store.read().await;
        Ok(store
            .by_email
            .get(email)
            .and_then(|id| store.by_id.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        // Check and insert under one write lock.
        let mut store = self.store.write().await;

        if store.by_email.contains_key(&user.email) {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }

        store.by_email.insert(user.email.clone(), user.id);
        store.by_id.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn user(email: &str) -> User {
        User::new("Ann".into(), email.into(), "hash".into())
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("ann@x.com")).await.unwrap();

        let by_email = repo.find_by_email("ann@x.com").await.unwrap().unwrap();
        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(by_email.id, created.id);
        assert_eq!(by_id.email, "ann@x.com");
        assert!(repo.find_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("ann@x.com")).await.unwrap();

        let err = repo.create(user("ann@x.com")).await.unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_admit_one() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(user("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }
}
