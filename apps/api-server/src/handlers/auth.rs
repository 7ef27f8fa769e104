//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::services::AuthSession;
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(state: &AppState, session: AuthSession) -> AuthResponse {
    AuthResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.token_lifetime_seconds().max(0) as u64,
        user: UserResponse::from(&session.user),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .auth
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        auth_response(&state, session),
        "User registered successfully",
    )))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.auth.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        auth_response(&state, session),
        "Login successful",
    )))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    let user = identity.into_inner();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse::from(&user))))
}
