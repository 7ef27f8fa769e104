//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;


use actix_web::{HttpResponse, web};
use quill_shared::ErrorResponse;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Resource not found".into()).into()),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes; fixed paths ahead of `{id}`
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/categories/list", web::get().to(posts::categories))
                    .route("/category/{category}", web::get().to(posts::by_category))
                    .route("/search/{query}", web::get().to(posts::search))
                    .route("/featured/popular", web::get().to(posts::popular))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/like", web::patch().to(posts::like)),
            )
            // Comment routes
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create))
                    .route("/post/{post_id}", web::get().to(comments::list_for_post))
                    .route("/{id}", web::delete().to(comments::delete)),
            )
            .default_service(web::to(route_not_found)),
    );
}

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found("Route not found"))
}
