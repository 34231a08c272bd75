//! # Authentication
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Access Control Gate                              │
//! │                                                                         │
//! │  password.rs   argon2 hash / verify (blocking pool)                     │
//! │  session.rs    token ──► SessionContext, TTL-bound, in memory           │
//! │  extract.rs    AuthUser / AdminUser extractors (Bearer header)          │
//! │                                                                         │
//! │  Unauthenticated ──► 401 UNAUTHENTICATED                               │
//! │  Not admin       ──► 403 PERMISSION_DENIED                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod extract;
pub mod password;
pub mod session;

pub use extract::{extract_bearer_token, AdminUser, AuthUser};
pub use session::SessionStore;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Runs a password hash off the async workers.
pub async fn hash_in_background(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("Hashing task failed: {}", e)))?
}

/// Runs a password check off the async workers.
///
/// With no stored hash the check runs against a dummy and always fails.
pub async fn verify_in_background(password: String, hash: Option<String>) -> ApiResult<bool> {
    let check = move || match hash {
        Some(hash) => password::verify_password(&password, &hash),
        None => {
            password::verify_password(&password, password::dummy_hash());
            false
        }
    };

    tokio::task::spawn_blocking(check)
        .await
        .map_err(|e| ApiError::internal(format!("Verification task failed: {}", e)))
}

/// Builds the dummy hash off the async workers, so the first login for an
/// unknown username costs the same as any other.
pub async fn prepare_dummy_hash() -> ApiResult<()> {
    tokio::task::spawn_blocking(password::dummy_hash)
        .await
        .map_err(|e| ApiError::internal(format!("Hashing task failed: {}", e)))?;
    Ok(())
}

/// Creates the configured admin account when no user exists yet.
///
/// Returns whether an account was created.
pub async fn bootstrap_admin(state: &AppState) -> ApiResult<bool> {
    if state.db.users().count().await? > 0 {
        return Ok(false);
    }

    let hash = hash_in_background(state.config.admin_password.clone()).await?;
    let admin = state
        .db
        .users()
        .create(&state.config.admin_username, &hash, true)
        .await?;

    info!(username = %admin.username, "Bootstrap admin account created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_hash_prepared_before_first_login() {
        prepare_dummy_hash().await.unwrap();
        assert!(password::dummy_hash_ready());

        // Unknown users still fail, with no hash left to build.
        assert!(!verify_in_background("anything".to_string(), None).await.unwrap());
    }
}
