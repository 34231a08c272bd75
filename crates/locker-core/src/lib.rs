//! # locker-core: Pure Domain Logic for Locker
//!
//! Entity model, money arithmetic, validation rules, the access-control gate
//! and report aggregation for the Locker inventory backend. Nothing in here
//! touches a database, a socket or a file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Locker Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 locker-api (axum handlers)                      │   │
//! │  │    login, sell, restock, approve, scan, export ...              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ locker-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │  report   │  │   │
//! │  │   │  Variant  │  │   Money   │  │  gate     │  │  Sheet    │  │   │
//! │  │   │  Sale ... │  │  (cents)  │  │  checks   │  │  totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 locker-db (Database Layer)                      │   │
//! │  │         SQLite queries, migrations, transactions               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Product, Variant, Sale, Purchase, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Input rules
//! - [`session`] - Session context and the admin gate
//! - [`report`] - Revenue / profit aggregation and tabular sheets
//!
//! ## Example Usage
//!
//! ```rust
//! use locker_core::money::Money;
//!
//! let price = Money::from_cents(7999);
//! let cost = Money::from_cents(4999);
//! assert_eq!((price - cost).to_string(), "$30.00");
//! ```

pub mod error;
pub mod money;
pub mod report;
pub mod session;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::SessionContext;
pub use types::*;

/// Photo reference used when a variant has no uploaded image.
///
/// Shared by every such variant, so it is never released on delete.
pub const PLACEHOLDER_PHOTO: &str = "placeholder.jpg";

/// Upper bound for restock and pre-order quantities.
///
/// Catches typos like 1000 instead of 10 at the boundary.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Upper bound for a variant's stock level, set or reached by restocking.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Upper bound for any single amount in cents ($100,000,000.00).
///
/// Keeps report sums over the ledger inside i64.
pub const MAX_MONEY_CENTS: i64 = 10_000_000_000;

/// Image extensions accepted for variant photos (lowercase).
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
