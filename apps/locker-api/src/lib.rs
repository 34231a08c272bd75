//! # Locker API
//!
//! HTTP server for the locker inventory backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Locker API Modules                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth          │  │  handlers      │  │  routes                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • passwords    │  │ • catalog      │  │ • /api/v1 table            ││
//! │  │ • sessions     │  │ • transactions │  │ • trace / request id       ││
//! │  │ • extractors   │  │ • requests     │  │ • timeout / catch panic    ││
//! │  └────────────────┘  │ • reports      │  └────────────────────────────┘│
//! │                      └────────────────┘                                │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  assets        │  │  export        │  │  config / error / state    ││
//! │  │  photo files   │  │  CSV sheets    │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is honoured):
//! - `LOCKER_HOST` / `LOCKER_PORT` - listen address (default: 0.0.0.0:3000)
//! - `LOCKER_DB_PATH` - SQLite file (default: ./locker.db)
//! - `LOCKER_DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `LOCKER_UPLOAD_DIR` - variant photos (default: ./uploads)
//! - `LOCKER_PUBLIC_URL` - base of customer-facing links (default: http://localhost:3000)
//! - `LOCKER_SESSION_TTL_SECS` - session lifetime (default: 43200)
//! - `LOCKER_MAX_UPLOAD_BYTES` - photo size cap (default: 5MB)
//! - `LOCKER_ADMIN_USERNAME` / `LOCKER_ADMIN_PASSWORD` - first-run admin
//! - `LOCKER_REQUEST_TIMEOUT_SECS` - per-request timeout (default: 30)
//! - `RUST_LOG` - log filter

pub mod assets;
pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-exports
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::AppState;
