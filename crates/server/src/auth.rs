use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use golf_core::models::UserId;

use crate::error::ApiError;
use crate::state::{AppState, blocking};

pub const AUTH_HEADER: &str = "X-Authorization";

/// Token from the `X-Authorization` header
pub fn session_token(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::Unauthorized("No session token provided"))
}

/// The player behind the request's session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)?;
        let users = state.users.clone();
        let user_id = blocking(move || users.user_id_for_token(&token))
            .await?
            .ok_or(ApiError::Unauthorized("Invalid or expired session token"))?;

        Ok(AuthUser(user_id))
    }
}
