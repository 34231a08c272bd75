//! Login, logout and whoami.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{verify_in_background, AuthUser};
use crate::error::ApiResult;
use crate::state::AppState;
use locker_core::{CoreError, SessionContext};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionContext,
    pub expires_in_secs: u64,
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state.db.users().find_by_username(&req.username).await?;

    let hash = user.as_ref().map(|user| user.password_hash.clone());
    let verified = verify_in_background(req.password, hash).await?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            warn!(username = %req.username.trim(), "Login failed");
            return Err(CoreError::AuthFailed.into());
        }
    };

    let context = SessionContext {
        user_id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    };
    let token = state.sessions.create(context.clone()).await;

    info!(username = %context.username, is_admin = context.is_admin, "Login");
    Ok(Json(LoginResponse {
        token,
        user: context,
        expires_in_secs: state.sessions.ttl().as_secs(),
    }))
}

/// `POST /auth/logout`
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> StatusCode {
    state.sessions.revoke(&user.token).await;
    info!(username = %user.session.username, "Logout");
    StatusCode::NO_CONTENT
}

/// `GET /auth/me`
pub async fn me(user: AuthUser) -> Json<SessionContext> {
    Json(user.session)
}
