//! Staff account management (admin only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth::{hash_in_background, AdminUser};
use crate::error::ApiResult;
use crate::state::AppState;
use locker_core::validation::{validate_password, validate_username};
use locker_core::User;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// `GET /users`
pub async fn list(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.db.users().list().await?))
}

/// `POST /users`
pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;

    let hash = hash_in_background(req.password).await?;
    let user = state.db.users().create(&req.username, &hash, req.is_admin).await?;

    info!(by = %admin.username, username = %user.username, is_admin = user.is_admin, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `DELETE /users/{id}`
///
/// Also ends every live session of the deleted account.
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    admin.ensure_not_self(&id)?;

    state.db.users().delete(&id).await?;
    let revoked = state.sessions.revoke_user(&id).await;

    info!(by = %admin.username, user_id = %id, revoked, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
