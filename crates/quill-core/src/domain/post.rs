use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Posts are numbered from a per-repository counter, starting at 1.
pub type PostId = u64;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_FEATURED_IMAGE: &str = "https://via.placeholder.com/800x400";
pub const TITLE_MAX_CHARS: usize = 200;
pub const EXCERPT_MAX_CHARS: usize = 300;

const EXCERPT_SOURCE_CHARS: usize = 150;
const WORDS_PER_MINUTE: usize = 200;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
}

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author_id: Uuid,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: String,
    pub read_time: String,
    pub likes: u64,
    pub comments_count: u64,
    pub views: u64,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Ranking key for the popular sort.
    pub fn popularity(&self) -> u64 {
        self.views.saturating_add(self.likes)
    }
}

/// A validated post awaiting an id from the repository.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author_id: Uuid,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: String,
    pub status: PostStatus,
}

impl NewPost {
    /// Materialize the post with its assigned id and fresh timestamps.
    pub fn into_post(self, id: PostId) -> Post {
        let now = Utc::now();
        Post {
            id,
            read_time: read_time(&self.content),
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            author_id: self.author_id,
            category: self.category,
            tags: self.tags,
            featured_image: self.featured_image,
            likes: 0,
            comments_count: 0,
            views: 0,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a post.
///
/// `None` leaves a field untouched; `Some` overwrites it, even with an empty value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
}

impl PostChanges {
    /// Merge the supplied fields into `post` and refresh `updated_at`.
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.read_time = read_time(&content);
            post.content = content;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(category) = self.category {
            post.category = category;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(featured_image) = self.featured_image {
            post.featured_image = featured_image;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        post.updated_at = Utc::now();
    }
}

/// Estimated reading time, `ceil(words / 200)` minutes.
pub fn read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    format!("{} min read", words.div_ceil(WORDS_PER_MINUTE))
}

/// First 150 characters of `content` followed by an ellipsis.
pub fn default_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_SOURCE_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
