//! # Ledger Repository
//!
//! The two flows that move stock: selling and admin-approved restocking.
//!
//! ## Stock State Machine (per variant)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sell ──► UPDATE stock = stock - 1 WHERE stock > 0                     │
//! │             │                                                           │
//! │             ├── 1 row  ──► INSERT sale, COMMIT ──► Sold { new_stock }   │
//! │             └── 0 rows ──► variant exists? ──► OutOfStock               │
//! │                                   └─ no ──────► NotFound                │
//! │                                                                         │
//! │  request_restock ──► INSERT purchase (pending, stock untouched)        │
//! │                                                                         │
//! │  approve ──► DELETE purchase RETURNING quantity                        │
//! │                 ├── row  ──► UPDATE stock = stock + quantity            │
//! │                 │              WHERE stock <= MAX_STOCK - quantity      │
//! │                 │              ├── 1 row  ──► COMMIT                    │
//! │                 │              └── 0 rows ──► ROLLBACK, OutOfRange      │
//! │                 └── none ──► NotFound (already approved or rejected)    │
//! │                                                                         │
//! │  reject  ──► DELETE purchase ──► none? NotFound                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decrement is a single compare-and-decrement statement, so two
//! concurrent sells of the last unit cannot both succeed and stock never
//! goes below zero.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use locker_core::validation::{stock_overflow, validate_money_cents, validate_quantity};
use locker_core::{PendingPurchase, Purchase, Sale, SellOutcome, Variant, MAX_STOCK};

/// Repository for sales and restock requests.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    // =========================================================================
    // Sell
    // =========================================================================

    /// Sells one unit of a variant at the caller-supplied price.
    ///
    /// `revenue_cents` may differ from the list price (discounts) but must
    /// not be negative.
    pub async fn sell(&self, variant_id: &str, revenue_cents: i64) -> DbResult<SellOutcome> {
        validate_money_cents("revenue", revenue_cents)?;

        let mut tx = self.pool.begin().await?;

        let new_stock: Option<i64> = sqlx::query_scalar(
            "UPDATE variants SET stock = stock - 1 WHERE id = ?1 AND stock > 0 RETURNING stock",
        )
        .bind(variant_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(new_stock) = new_stock else {
            let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM variants WHERE id = ?1")
                .bind(variant_id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;

            if exists.is_none() {
                return Err(DbError::not_found("Variant", variant_id));
            }

            debug!(variant_id = %variant_id, "Sell refused: out of stock");
            return Ok(SellOutcome::OutOfStock {
                variant_id: variant_id.to_string(),
            });
        };

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            variant_id: variant_id.to_string(),
            quantity: 1,
            revenue_cents,
            sold_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO sales (id, variant_id, quantity, revenue_cents, sold_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&sale.id)
        .bind(&sale.variant_id)
        .bind(sale.quantity)
        .bind(sale.revenue_cents)
        .bind(sale.sold_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            sale_id = %sale.id,
            variant_id = %variant_id,
            revenue_cents,
            new_stock,
            "Sale recorded"
        );
        Ok(SellOutcome::Sold { sale, new_stock })
    }

    // =========================================================================
    // Restock
    // =========================================================================

    /// Files a pending restock request. Stock is untouched until approval.
    pub async fn request_restock(&self, variant_id: &str, quantity: i64) -> DbResult<Purchase> {
        validate_quantity(quantity)?;

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            variant_id: variant_id.to_string(),
            quantity,
            requested_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO purchases (id, variant_id, quantity, requested_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&purchase.id)
        .bind(&purchase.variant_id)
        .bind(purchase.quantity)
        .bind(purchase.requested_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_missing_parent("Variant", variant_id))?;

        debug!(purchase_id = %purchase.id, variant_id = %variant_id, quantity, "Restock requested");
        Ok(purchase)
    }

    /// Gets a pending purchase by ID.
    pub async fn get_purchase(&self, id: &str) -> DbResult<Purchase> {
        sqlx::query_as::<_, Purchase>(
            "SELECT id, variant_id, quantity, requested_at FROM purchases WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Purchase", id))
    }

    /// Approves a pending purchase: adds its quantity to stock and removes
    /// it. Returns the restocked variant.
    ///
    /// A second approval of the same id finds nothing and yields NotFound.
    pub async fn approve(&self, purchase_id: &str) -> DbResult<Variant> {
        let mut tx = self.pool.begin().await?;

        let claimed: Option<(String, i64)> = sqlx::query_as(
            "DELETE FROM purchases WHERE id = ?1 RETURNING variant_id, quantity",
        )
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (variant_id, quantity) =
            claimed.ok_or_else(|| DbError::not_found("Purchase", purchase_id))?;

        let variant = sqlx::query_as::<_, Variant>(
            r#"
            UPDATE variants SET stock = stock + ?2
            WHERE id = ?1 AND stock <= ?3 - ?2
            RETURNING id, product_id, barcode, variant_type, size, cost_cents,
                      selling_price_cents, stock, photo, created_at
            "#,
        )
        .bind(&variant_id)
        .bind(quantity)
        .bind(MAX_STOCK)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls back the claim, so the purchase
        // stays pending when stock is at the cap.
        let variant = match variant {
            Some(variant) => variant,
            None => {
                let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM variants WHERE id = ?1")
                    .bind(&variant_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                return Err(match exists {
                    Some(_) => stock_overflow().into(),
                    None => DbError::not_found("Variant", &variant_id),
                });
            }
        };

        tx.commit().await?;

        debug!(
            purchase_id = %purchase_id,
            variant_id = %variant_id,
            quantity,
            new_stock = variant.stock,
            "Purchase approved"
        );
        Ok(variant)
    }

    /// Rejects a pending purchase. Stock is untouched.
    pub async fn reject(&self, purchase_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = ?1")
            .bind(purchase_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Purchase", purchase_id));
        }

        debug!(purchase_id = %purchase_id, "Purchase rejected");
        Ok(())
    }

    /// Pending purchases with product name, type and size, oldest first.
    pub async fn list_pending(&self) -> DbResult<Vec<PendingPurchase>> {
        let rows = sqlx::query_as::<_, PendingPurchase>(
            r#"
            SELECT pu.id, pu.variant_id, p.name AS product_name,
                   v.variant_type, v.size, pu.quantity, pu.requested_at
            FROM purchases pu
            INNER JOIN variants v ON v.id = pu.variant_id
            INNER JOIN products p ON p.id = v.product_id
            ORDER BY pu.requested_at, pu.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
