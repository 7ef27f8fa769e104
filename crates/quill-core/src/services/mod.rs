//! Domain services - orchestrate ports into the operations the API exposes.

mod auth;
mod comments;
mod posts;

pub use auth::{AuthService, AuthSession};
pub use comments::CommentService;
pub use posts::{CreatePost, POPULAR_LIMIT, PostService};
