//! Comment use cases.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, NewComment, PostId, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Attach a comment to an existing post and bump its comment counter.
    pub async fn create(
        &self,
        author: &User,
        post_id: PostId,
        content: &str,
    ) -> Result<Comment, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation(
                "Comment content is required".to_string(),
            ));
        }

        // Bumping the counter doubles as the existence check.
        let count = self
            .posts
            .record_comment(post_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("Post", post_id),
                other => other.into(),
            })?;

        let comment = self
            .comments
            .create(NewComment {
                post_id,
                author_id: author.id,
                author_name: author.name.clone(),
                content: content.to_string(),
            })
            .await?;

        tracing::info!(post_id, comments = count, comment_id = %comment.id, "Comment created");
        Ok(comment)
    }

    pub async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.find_by_post(post_id).await?)
    }

    /// Remove a comment. The post's comment counter is left as is.
    pub async fn delete(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.comments.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Comment", id),
            other => other.into(),
        })
    }
}
