use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use golf_core::Error;
use golf_core::models::{User, UserId};

use super::Success;
use crate::auth::{AuthUser, session_token};
use crate::error::ApiError;
use crate::extract::ValidatedPath;
use crate::state::{AppState, blocking};

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Success>, ApiError> {
    let token = session_token(&headers)?;
    let users = state.users.clone();

    if !blocking(move || users.revoke_token(&token)).await? {
        return Err(ApiError::Unauthorized("Invalid or expired session token"));
    }

    Ok(Success::ok())
}

pub async fn by_id(
    State(state): State<AppState>,
    ValidatedPath(user_id): ValidatedPath<UserId>,
) -> Result<Json<User>, ApiError> {
    let users = state.users.clone();
    Ok(Json(blocking(move || require_user(&users, user_id)).await?))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let users = state.users.clone();
    Ok(Json(blocking(move || require_user(&users, user_id)).await?))
}

fn require_user(users: &golf_core::db::UsersDao, user_id: UserId) -> golf_core::Result<User> {
    users
        .get_user(user_id)?
        .ok_or_else(|| Error::NotFound("User not found".into()))
}
