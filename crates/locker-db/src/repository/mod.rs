//! # Repository Module
//!
//! Database repositories for Locker.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.ledger().sell(&variant_id, 7999)                           │
//! │       ▼                                                                 │
//! │  LedgerRepository                                                      │
//! │  ├── sell(&self, variant_id, revenue_cents)                            │
//! │  ├── request_restock(&self, variant_id, quantity)                      │
//! │  ├── approve(&self, purchase_id)                                       │
//! │  └── reject(&self, purchase_id)                                        │
//! │       │                                                                 │
//! │       │  BEGIN … COMMIT                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Products, variants, stock, photos
//! - [`ledger::LedgerRepository`] - Sales and restock requests
//! - [`requests::RequestRepository`] - Customer requests and pre-orders
//! - [`users::UserRepository`] - Staff accounts
//! - [`report::ReportRepository`] - Totals and export rows

pub mod catalog;
pub mod ledger;
pub mod report;
pub mod requests;
pub mod users;
