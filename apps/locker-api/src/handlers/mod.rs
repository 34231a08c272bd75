//! # HTTP Handlers
//!
//! Thin adapters: extract, call one repository operation, log, respond.
//! Gating happens in the extractors, rules in `locker-core`, persistence in
//! `locker-db`.
//!
//! | Module         | Routes                                             |
//! |----------------|----------------------------------------------------|
//! | `auth`         | `/auth/login`, `/auth/logout`, `/auth/me`          |
//! | `users`        | `/users`                                           |
//! | `catalog`      | `/catalog`, `/products`, `/variants`               |
//! | `transactions` | `/scan`, `/transactions/*`, `/purchases`           |
//! | `requests`     | `/requests`, `/public/*`                           |
//! | `reports`      | `/reports/*`, `/export/*`                          |
//! | `system`       | `/assets/{photo_ref}`, `/health`                   |

pub mod auth;
pub mod catalog;
pub mod reports;
pub mod requests;
pub mod system;
pub mod transactions;
pub mod users;
