//! Session extractors.
//!
//! Put [`AuthUser`] or [`AdminUser`] in a handler's arguments to gate it.
//! Both reject before the handler body runs, so a refused request never
//! touches the store.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::state::AppState;
use locker_core::{CoreError, SessionContext};

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Any logged-in user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session: SessionContext,
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(CoreError::Unauthenticated)?;

        let session = state
            .sessions
            .get(token)
            .await
            .ok_or(CoreError::Unauthenticated)?;

        Ok(AuthUser {
            session,
            token: token.to_string(),
        })
    }
}

/// A logged-in admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionContext);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if let Err(e) = user
            .session
            .require_admin(&format!("{} {}", parts.method, parts.uri.path()))
        {
            tracing::warn!(user = %user.session.username, path = %parts.uri.path(), "Admin action refused");
            return Err(e.into());
        }

        Ok(AdminUser(user.session))
    }
}
