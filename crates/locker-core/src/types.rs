//! # Domain Types
//!
//! Entities shared by every layer of Locker.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Product ──owns──► Variant ──owns──┬──► Sale            (append-only)   │
//! │  (name)            (barcode,       ├──► Purchase        (pending only)  │
//! │                     stock ≥ 0)     ├──► CustomerRequest (informational) │
//! │                                    └──► PreOrder        (informational) │
//! │                                                                         │
//! │  Deleting a Product or Variant cascades down the arrows.                │
//! │                                                                         │
//! │  User (independent; consulted only by the access gate)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity uses a UUID v4 string as its identity. Barcode and username
//! are the unique business keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product. Its purchasable units are [`Variant`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    /// Display name. Not unique.
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Variant
// =============================================================================

/// A purchasable SKU of a product: one barcode, one type/size, one stock
/// count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Variant {
    pub id: String,
    pub product_id: String,
    /// Unique across all variants.
    pub barcode: String,
    /// Descriptive type, e.g. "Home", "Away", "Training".
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
    pub cost_cents: i64,
    pub selling_price_cents: i64,
    /// Units on hand. Never negative.
    pub stock: i64,
    /// Photo asset reference (file name in the asset store).
    pub photo: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Variant {
    /// Returns the cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Returns the list selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// True when a sell attempt would be redirected to the request flows.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// True when the photo is the shared placeholder.
    pub fn has_placeholder_photo(&self) -> bool {
        self.photo == crate::PLACEHOLDER_PHOTO
    }
}

/// Input for creating a variant.
///
/// `photo` is `None` until an image is uploaded; the placeholder is used in
/// the meantime.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVariant {
    pub barcode: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
    pub cost_cents: i64,
    pub selling_price_cents: i64,
    pub stock: i64,
    #[serde(default)]
    pub photo: Option<String>,
}

/// A variant together with the name of its product.
///
/// Returned by barcode lookup.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantWithProduct {
    pub product_name: String,
    pub variant: Variant,
}

/// Just enough about a variant for a customer-facing form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VariantLabel {
    pub variant_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
}

/// One product with its variants, as listed by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    pub product: Product,
    pub variants: Vec<Variant>,
}

// =============================================================================
// Sale
// =============================================================================

/// One sold unit. Append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub variant_id: String,
    /// Always 1 in the sell flow.
    pub quantity: i64,
    /// Price actually charged, supplied by the seller (may differ from list).
    pub revenue_cents: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// Result of a sell attempt.
///
/// Running out of stock is an expected outcome, not an error: the caller is
/// sent to the contact / pre-order flows instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum SellOutcome {
    /// One unit was taken off the shelf and recorded.
    Sold { sale: Sale, new_stock: i64 },
    /// Stock was zero; nothing changed.
    OutOfStock { variant_id: String },
}

// =============================================================================
// Purchase (restock request)
// =============================================================================

/// A pending restock request awaiting admin approval.
///
/// Exists only until it is approved (stock += quantity) or rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Purchase {
    pub id: String,
    pub variant_id: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub requested_at: DateTime<Utc>,
}

/// Pending purchase joined with its variant's labels.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PendingPurchase {
    pub id: String,
    pub variant_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub requested_at: DateTime<Utc>,
}

// =============================================================================
// Customer requests & pre-orders
// =============================================================================

/// A customer asking to be told when an out-of-stock variant returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerRequest {
    pub id: String,
    pub variant_id: String,
    pub customer_name: String,
    pub contact_info: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A customer's advance order for an out-of-stock variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PreOrder {
    pub id: String,
    pub variant_id: String,
    pub customer_name: String,
    pub contact_info: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Contact details submitted through a public form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactDetails {
    pub customer_name: String,
    pub contact_info: String,
}

/// Customer request joined with its variant's labels.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerRequestView {
    pub id: String,
    pub variant_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
    pub customer_name: String,
    pub contact_info: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Pre-order joined with its variant's labels.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PreOrderView {
    pub id: String,
    pub variant_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
    pub customer_name: String,
    pub contact_info: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Everything waiting on staff attention.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RequestsOverview {
    pub customer_requests: Vec<CustomerRequestView>,
    pub purchases: Vec<PendingPurchase>,
    pub pre_orders: Vec<PreOrderView>,
}

// =============================================================================
// User
// =============================================================================

/// A staff account.
///
/// The credential hash never leaves the server.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip)]
    #[ts(skip)]
    pub password_hash: String,
    pub is_admin: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}
