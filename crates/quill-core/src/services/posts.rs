//! Post use cases: validation and defaults in front of the post repository.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    DEFAULT_CATEGORY, DEFAULT_FEATURED_IMAGE, EXCERPT_MAX_CHARS, NewPost, Page, Post, PostChanges,
    PostFilter, PostId, PostQuery, PostSort, PostStatus, TITLE_MAX_CHARS, default_excerpt,
};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// How many posts the featured listing returns.
pub const POPULAR_LIMIT: usize = 5;

/// Input for creating a post. Blank optional fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
}

impl CreatePost {
    /// Check required fields and fill defaults.
    pub fn validate(self, author_id: Uuid) -> Result<NewPost, DomainError> {
        let title = self.title.trim().to_string();
        if title.is_empty() || self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title and content are required".to_string(),
            ));
        }
        check_title(&title)?;

        let excerpt = match non_blank(self.excerpt) {
            Some(excerpt) => {
                check_excerpt(&excerpt)?;
                excerpt
            }
            None => default_excerpt(&self.content),
        };

        Ok(NewPost {
            title,
            excerpt,
            content: self.content,
            author_id,
            category: non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags: clean_tags(self.tags.unwrap_or_default()),
            featured_image: non_blank(self.featured_image)
                .unwrap_or_else(|| DEFAULT_FEATURED_IMAGE.to_string()),
            status: self.status.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn check_title(title: &str) -> Result<(), DomainError> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "Title cannot be more than {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn check_excerpt(excerpt: &str) -> Result<(), DomainError> {
    if excerpt.chars().count() > EXCERPT_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "Excerpt cannot be more than {EXCERPT_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn check_changes(changes: &mut PostChanges) -> Result<(), DomainError> {
    if let Some(title) = changes.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::Validation("Title cannot be empty".to_string()));
        }
        check_title(title)?;
    }
    if let Some(content) = &changes.content {
        if content.trim().is_empty() {
            return Err(DomainError::Validation("Content cannot be empty".to_string()));
        }
    }
    if let Some(excerpt) = &changes.excerpt {
        check_excerpt(excerpt)?;
    }
    if let Some(tags) = changes.tags.take() {
        changes.tags = Some(clean_tags(tags));
    }
    Ok(())
}

/// Post operations exposed by the API.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn create(&self, author_id: Uuid, input: CreatePost) -> Result<Post, DomainError> {
        let draft = input.validate(author_id)?;
        let post = self.posts.create(draft).await?;

        tracing::info!(post_id = post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// Fetch a post for display. Every call counts as one view.
    pub async fn get(&self, id: PostId) -> Result<Post, DomainError> {
        self.posts
            .record_view(id)
            .await
            .map_err(|e| post_error(e, id))
    }

    pub async fn list(&self, query: &PostQuery) -> Result<Page<Post>, DomainError> {
        Ok(self.posts.list(query).await?)
    }

    pub async fn update(&self, id: PostId, mut changes: PostChanges) -> Result<Post, DomainError> {
        check_changes(&mut changes)?;

        let post = self
            .posts
            .update(id, changes)
            .await
            .map_err(|e| post_error(e, id))?;

        tracing::info!(post_id = id, "Post updated");
        Ok(post)
    }

    pub async fn delete(&self, id: PostId) -> Result<Post, DomainError> {
        let post = self.posts.delete(id).await.map_err(|e| post_error(e, id))?;

        tracing::info!(post_id = id, "Post deleted");
        Ok(post)
    }

    /// Add one like. Likes are not deduplicated per user.
    pub async fn like(&self, id: PostId) -> Result<u64, DomainError> {
        self.posts.like(id).await.map_err(|e| post_error(e, id))
    }

    pub async fn categories(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.posts.categories().await?)
    }

    /// Posts whose category equals `category`, ignoring case.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Post>, DomainError> {
        let filter = PostFilter::new().category_equals(category);
        Ok(self.posts.select(&filter, PostSort::Newest).await?)
    }

    /// Free-text search, including the category field.
    pub async fn search(&self, text: &str) -> Result<Vec<Post>, DomainError> {
        let filter = PostFilter::new().search(text).search_in_category();
        Ok(self.posts.select(&filter, PostSort::Newest).await?)
    }

    pub async fn popular(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts = self
            .posts
            .select(&PostFilter::default(), PostSort::Popular)
            .await?;
        posts.truncate(POPULAR_LIMIT);
        Ok(posts)
    }
}

fn post_error(err: RepoError, id: PostId) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("Post", id),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, content: &str) -> CreatePost {
        CreatePost {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_fills_defaults() {
        let author = Uuid::new_v4();
        let draft = input("  Hi  ", "hello world").validate(author).unwrap();

        assert_eq!(draft.title, "Hi");
        assert_eq!(draft.excerpt, "hello world...");
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert_eq!(draft.featured_image, DEFAULT_FEATURED_IMAGE);
        assert_eq!(draft.status, PostStatus::Published);
        assert_eq!(draft.author_id, author);
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_validate_treats_blank_optionals_as_missing() {
        let draft = CreatePost {
            excerpt: Some("   ".into()),
            category: Some("".into()),
            tags: Some(vec![" rust ".into(), "".into()]),
            ..input("Hi", "body")
        }
        .validate(Uuid::nil())
        .unwrap();

        assert_eq!(draft.excerpt, "body...");
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert_eq!(draft.tags, vec!["rust".to_string()]);
    }

    #[test]
    fn test_validate_requires_title_and_content() {
        for (title, content) in [("", "body"), ("Hi", "  "), ("", "")] {
            let err = input(title, content).validate(Uuid::nil()).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn test_validate_enforces_lengths() {
        let long_title = input(&"t".repeat(TITLE_MAX_CHARS + 1), "body");
        assert!(long_title.validate(Uuid::nil()).is_err());

        let long_excerpt = CreatePost {
            excerpt: Some("e".repeat(EXCERPT_MAX_CHARS + 1)),
            ..input("Hi", "body")
        };
        assert!(long_excerpt.validate(Uuid::nil()).is_err());
    }

    #[test]
    fn test_changes_reject_empty_title() {
        let mut changes = PostChanges {
            title: Some("  ".into()),
            ..Default::default()
        };

        assert!(check_changes(&mut changes).is_err());
    }

    #[test]
    fn test_changes_may_clear_optional_fields() {
        let mut changes = PostChanges {
            excerpt: Some(String::new()),
            tags: Some(vec![]),
            ..Default::default()
        };

        check_changes(&mut changes).unwrap();
        assert_eq!(changes.excerpt.as_deref(), Some(""));
        assert_eq!(changes.tags, Some(vec![]));
    }

    #[test]
    fn test_not_found_maps_to_post_entity() {
        let err = post_error(RepoError::NotFound, 42);

        assert!(matches!(err, DomainError::NotFound { entity: "Post", ref id } if id == "42"));
    }
}
