//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{
    PageRequest, Pagination, Post, PostChanges, PostFilter, PostQuery, PostSort, PostStatus, Role,
    User,
};
use quill_core::services::CreatePost;

/// Request to register a new user. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Token plus the user it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
}

impl From<CreatePostRequest> for CreatePost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            excerpt: req.excerpt,
            category: req.category,
            tags: req.tags,
            featured_image: req.featured_image,
            status: req.status,
        }
    }
}

/// Body of `PUT /posts/{id}`.
///
/// Empty strings count as omitted, so a field cannot be cleared over HTTP.
/// A supplied `tags` array always replaces the tags, even when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: supplied(req.title),
            content: supplied(req.content),
            excerpt: supplied(req.excerpt),
            category: supplied(req.category),
            tags: req.tags,
            featured_image: supplied(req.featured_image),
            status: req.status,
        }
    }
}

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPostsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

impl From<ListPostsQuery> for PostQuery {
    fn from(query: ListPostsQuery) -> Self {
        let mut filter = PostFilter::new();
        if let Some(category) = &query.category {
            filter = filter.category_contains(category);
        }
        if let Some(search) = &query.search {
            filter = filter.search(search);
        }

        Self {
            filter,
            sort: query
                .sort
                .as_deref()
                .map(PostSort::parse)
                .unwrap_or_default(),
            page: PageRequest::new(query.page, query.limit),
        }
    }
}

/// One page of posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPostsResponse {
    pub category: String,
    pub posts: Vec<Post>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Post>,
    pub count: usize,
}

/// Body of `POST /comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: u64,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_skips_empty_strings() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"title": "", "category": "Tech", "tags": []}"#).unwrap();
        let changes = PostChanges::from(req);

        assert!(changes.title.is_none());
        assert_eq!(changes.category.as_deref(), Some("Tech"));
        assert_eq!(changes.tags, Some(vec![]));
        assert!(changes.content.is_none());
    }

    #[test]
    fn test_list_query_defaults() {
        let query = PostQuery::from(ListPostsQuery::default());

        assert_eq!(query, PostQuery::default());
    }

    #[test]
    fn test_list_query_maps_all_parameters() {
        let query = PostQuery::from(ListPostsQuery {
            category: Some("Tech".into()),
            search: Some("Rust".into()),
            page: Some(2),
            limit: Some(5),
            sort: Some("popular".into()),
        });

        assert_eq!(query.sort, PostSort::Popular);
        assert_eq!((query.page.page(), query.page.limit()), (2, 5));
        assert_eq!(query.filter.search_text(), Some("rust"));
    }

    #[test]
    fn test_create_request_reads_camel_case() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{"title": "Hi", "content": "Body", "featuredImage": "img.png", "status": "draft"}"#,
        )
        .unwrap();

        assert_eq!(req.featured_image.as_deref(), Some("img.png"));
        assert_eq!(req.status, Some(PostStatus::Draft));
    }

    #[test]
    fn test_user_response_hides_password() {
        let user = User::new("Ann".into(), "ann@x.com".into(), "$argon2id$hash".into());
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();

        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"createdAt\""));
    }
}
