//! Authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user, resolved from a `Bearer` token.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.0.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub User);

impl Identity {
    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .ok_or(AuthError::MissingAuth)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let Some(state) = state else {
                return Err(AppError::Internal("AppState not found in app data".to_string()));
            };
            let token = token?;

            match state.auth.authenticate(&token).await {
                Ok(user) => Ok(Identity(user)),
                Err(DomainError::Unauthenticated(e)) => {
                    tracing::debug!(error = %e, "Token rejected");
                    Err(e.into())
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}
