use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Comment, NewComment, NewPost, Page, Post, PostChanges, PostFilter, PostId, PostQuery, PostSort,
    User,
};
use crate::error::RepoError;

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their normalized email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user.
    ///
    /// Fails with [`RepoError::Constraint`] when the email is already taken.
    /// The check and the insert must be atomic.
    async fn create(&self, user: User) -> Result<User, RepoError>;
}

/// Ordered post collection. Mutations on one post never lose updates.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Assign the next id and store the post at the head of the collection.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Fetch a post without side effects.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Increment the view counter and return the updated post.
    async fn record_view(&self, id: PostId) -> Result<Post, RepoError>;

    /// Filter, sort and paginate.
    async fn list(&self, query: &PostQuery) -> Result<Page<Post>, RepoError>;

    /// Filter and sort without pagination.
    async fn select(&self, filter: &PostFilter, sort: PostSort) -> Result<Vec<Post>, RepoError>;

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError>;

    /// Remove and return the post.
    async fn delete(&self, id: PostId) -> Result<Post, RepoError>;

    /// Increment the like counter and return its new value.
    async fn like(&self, id: PostId) -> Result<u64, RepoError>;

    /// Increment the comment counter and return its new value.
    async fn record_comment(&self, id: PostId) -> Result<u64, RepoError>;

    /// Distinct categories in first-seen collection order.
    async fn categories(&self) -> Result<Vec<String>, RepoError>;
}

/// Comment store.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments on a post, newest first.
    async fn find_by_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError>;

    /// Remove and return the comment.
    async fn delete(&self, id: Uuid) -> Result<Comment, RepoError>;
}
