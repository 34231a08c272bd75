//! # Session Context
//!
//! Who is calling, and what they may do.
//!
//! ## Gate
//! ```text
//! request ──► token valid? ──no──► Unauthenticated
//!                 │
//!                yes
//!                 ▼
//!          SessionContext ──► admin-gated op? ──no──► proceed
//!                                   │
//!                                  yes
//!                                   ▼
//!                             is_admin? ──no──► PermissionDenied
//!                                   │
//!                                  yes ──► proceed
//! ```
//!
//! The context is passed explicitly into every operation that needs it.
//! There is no ambient "current user".

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// The authenticated caller of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionContext {
    pub user_id: String,
    pub username: String,
    pub is_admin: bool,
}

impl SessionContext {
    /// Fails with `PermissionDenied` unless the caller is an admin.
    ///
    /// ```rust
    /// use locker_core::SessionContext;
    ///
    /// let clerk = SessionContext {
    ///     user_id: "u1".into(),
    ///     username: "clerk".into(),
    ///     is_admin: false,
    /// };
    /// assert!(clerk.require_admin("approve purchase").is_err());
    /// ```
    pub fn require_admin(&self, action: &str) -> CoreResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(format!(
                "admin required to {}",
                action
            )))
        }
    }

    /// Fails with `PermissionDenied` when `user_id` is the caller's own id.
    pub fn ensure_not_self(&self, user_id: &str) -> CoreResult<()> {
        if self.user_id == user_id {
            return Err(CoreError::PermissionDenied(
                "cannot delete your own account".to_string(),
            ));
        }
        Ok(())
    }
}
