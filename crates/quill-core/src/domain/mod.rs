//! Domain entities - the core business objects.

mod comment;
mod post;
pub mod query;
mod user;

pub use comment::{Comment, NewComment};
pub use post::{
    NewPost, Post, PostChanges, PostId, PostStatus, DEFAULT_CATEGORY, DEFAULT_FEATURED_IMAGE,
    EXCERPT_MAX_CHARS, TITLE_MAX_CHARS, default_excerpt, read_time,
};
pub use query::{CategoryMatch, Page, PageRequest, Pagination, PostFilter, PostQuery, PostSort};
pub use user::{Role, User, mask_email, normalize_email};
