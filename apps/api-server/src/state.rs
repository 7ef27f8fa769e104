//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, PostRepository, UserRepository};
use quill_core::services::{AuthService, CommentService, PostService};
use quill_infra::{
    Argon2PasswordService, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService,
};

use crate::config::AppConfig;

/// Shared application state. Cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
}

impl AppState {
    /// Build the state from configuration, connecting to Postgres when a
    /// database is configured.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let users = user_store(config).await?;
        Ok(Self::assemble(users, config.jwt.clone()))
    }

    /// Fully volatile state.
    #[cfg(test)]
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::assemble(Arc::new(InMemoryUserRepository::new()), jwt)
    }

    fn assemble(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
        let comments: Arc<dyn CommentRepository> = Arc::new(InMemoryCommentRepository::new());

        Self {
            auth: AuthService::new(
                users,
                Arc::new(Argon2PasswordService::new()),
                Arc::new(JwtTokenService::new(jwt)),
            ),
            posts: PostService::new(posts.clone()),
            comments: CommentService::new(comments, posts),
        }
    }
}

#[cfg(feature = "postgres")]
async fn user_store(config: &AppConfig) -> anyhow::Result<Arc<dyn UserRepository>> {
    use migration::{Migrator, MigratorTrait};
    use quill_infra::database::{PostgresUserRepository, connect};

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Users are kept in memory.");
        return Ok(Arc::new(InMemoryUserRepository::new()));
    };

    let db = connect(db_config).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PostgresUserRepository::new(db)))
}

#[cfg(not(feature = "postgres"))]
async fn user_store(config: &AppConfig) -> anyhow::Result<Arc<dyn UserRepository>> {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    Ok(Arc::new(InMemoryUserRepository::new()))
}
