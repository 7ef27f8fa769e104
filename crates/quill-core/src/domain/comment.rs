use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PostId;

/// Comment entity - a reader's reply attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: PostId,
    pub author_id: Uuid,
    /// Denormalized so listings need no user lookup.
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A validated comment awaiting storage.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
}

impl NewComment {
    pub fn into_comment(self) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            post_id: self.post_id,
            author_id: self.author_id,
            author_name: self.author_name,
            content: self.content,
            created_at: Utc::now(),
        }
    }
}
