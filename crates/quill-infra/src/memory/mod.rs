//! In-memory repositories.
//!
//! Each store keeps its state behind a single async `RwLock`, so every
//! mutation is one critical section. Data is lost on process restart.

mod comments;
mod posts;
mod users;

pub use comments::InMemoryCommentRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;
