//! In-memory comment store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, NewComment, PostId};
use quill_core::error::RepoError;
use quill_core::ports::CommentRepository;

/// Comments held newest first.
pub struct InMemoryCommentRepository {
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            comments: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let comment = comment.into_comment();
        self.comments.write().await.insert(0, comment.clone());
        Ok(comment)
    }

    async fn find_by_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let comments = self.comments.read().await;
        Ok(comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<Comment, RepoError> {
        let mut comments = self.comments.write().await;
        let index = comments
            .iter()
            .position(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        Ok(comments.remove(index))
    }
}
