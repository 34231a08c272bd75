//! # locker-db: Database Layer for Locker
//!
//! SQLite persistence for the catalog, the ledger, customer requests and
//! staff accounts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Locker Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (POST /transactions/sell)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     locker-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Catalog       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Ledger        │    │ 0001_initial │  │   │
//! │  │   │               │    │ Requests      │    │              │  │   │
//! │  │   │               │    │ Users, Report │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (LOCKER_DB_PATH)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use locker_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./locker.db")).await?;
//! let outcome = db.ledger().sell(&variant_id, 7999).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::{CatalogRepository, ReleasedPhotos};
pub use repository::ledger::LedgerRepository;
pub use repository::report::ReportRepository;
pub use repository::requests::RequestRepository;
pub use repository::users::UserRepository;
