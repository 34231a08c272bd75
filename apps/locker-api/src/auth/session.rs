//! # Session Store
//!
//! Opaque bearer tokens mapped to a [`SessionContext`], held in memory.
//!
//! ```text
//! login ──► create(ctx) ──► token ──► client
//!                                        │
//!           Authorization: Bearer <token>│
//!                                        ▼
//!                          get(token) ──► Some(ctx)  (live)
//!                                    └──► None       (unknown / expired)
//! ```
//!
//! Sessions do not survive a restart; everyone logs in again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use locker_core::SessionContext;

#[derive(Debug, Clone)]
struct SessionEntry {
    context: SessionContext,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Shared, cloneable token table.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Opens a session and returns its token.
    pub async fn create(&self, context: SessionContext) -> String {
        // 244 random bits
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

        debug!(user_id = %context.user_id, "Session opened");
        self.sessions.write().await.insert(
            token.clone(),
            SessionEntry {
                context,
                expires_at: Instant::now() + self.ttl,
            },
        );

        token
    }

    /// Resolves a token. Expired entries are dropped on sight.
    pub async fn get(&self, token: &str) -> Option<SessionContext> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.context.clone()),
                Some(_) => {}
            }
        }

        self.sessions.write().await.remove(token);
        None
    }

    /// Ends one session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Ends every session of a user. Returns how many were closed.
    pub async fn revoke_user(&self, user_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.context.user_id != user_id);
        let revoked = before - sessions.len();

        if revoked > 0 {
            debug!(user_id = %user_id, revoked, "Sessions revoked");
        }
        revoked
    }

    /// Drops expired entries. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now));
        before - sessions.len()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(user_id: &str) -> SessionContext {
        SessionContext {
            user_id: user_id.to_string(),
            username: format!("user-{user_id}"),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(ctx("u1")).await;

        assert_eq!(token.len(), 64);
        assert_eq!(store.get(&token).await, Some(ctx("u1")));
        assert_eq!(store.get("bogus").await, None);
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create(ctx("u1")).await;

        assert_eq!(store.get(&token).await, None);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create(ctx("u1")).await;
        let b = store.create(ctx("u1")).await;
        let c = store.create(ctx("u2")).await;

        assert!(store.revoke(&a).await);
        assert!(!store.revoke(&a).await);

        assert_eq!(store.revoke_user("u1").await, 1);
        assert_eq!(store.get(&b).await, None);
        assert_eq!(store.get(&c).await, Some(ctx("u2")));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionStore::new(Duration::ZERO);
        store.create(ctx("u1")).await;
        store.create(ctx("u2")).await;

        assert_eq!(store.purge_expired().await, 2);
        assert_eq!(store.count().await, 0);
    }
}
