//! Shared application state, cloned into every handler.

use std::sync::Arc;

use locker_db::Database;

use crate::assets::PhotoStore;
use crate::auth::SessionStore;
use crate::config::ServerConfig;

/// Everything a handler can reach. Each field is cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub photos: PhotoStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        AppState {
            db,
            sessions: SessionStore::new(config.session_ttl()),
            photos: PhotoStore::new(config.upload_dir.clone()),
            config: Arc::new(config),
        }
    }
}
