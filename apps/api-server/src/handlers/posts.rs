//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{PostId, PostQuery};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CategoryPostsResponse, CreatePostRequest, LikeResponse, ListPostsQuery, PostListResponse,
    SearchResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = PostQuery::from(query.into_inner());
    let page = state.posts.list(&query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListResponse {
        posts: page.items,
        pagination: page.pagination,
    })))
}

/// GET /api/posts/{id} - counts as a view
pub async fn get(state: web::Data<AppState>, path: web::Path<PostId>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts - Protected route
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.0.id, body.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post,
        "Post created successfully",
    )))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(path.into_inner(), body.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post,
        "Post updated successfully",
    )))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}

/// PATCH /api/posts/{id}/like
pub async fn like(state: web::Data<AppState>, path: web::Path<PostId>) -> AppResult<HttpResponse> {
    let likes = state.posts.like(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(LikeResponse { likes })))
}

/// GET /api/posts/categories/list
pub async fn categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.posts.categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// GET /api/posts/category/{category}
pub async fn by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = path.into_inner();
    let posts = state.posts.by_category(&category).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryPostsResponse {
        category,
        count: posts.len(),
        posts,
    })))
}

/// GET /api/posts/search/{query}
pub async fn search(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let query = path.into_inner();
    let results = state.posts.search(&query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(SearchResponse {
        query,
        count: results.len(),
        results,
    })))
}

/// GET /api/posts/featured/popular
pub async fn popular(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.popular().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}
