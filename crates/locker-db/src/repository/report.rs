//! # Report Repository
//!
//! Read-only queries behind the reporting view. Nothing here is stored;
//! every figure is recomputed from the ledger and the catalog on demand.

use sqlx::SqlitePool;

use crate::error::DbResult;
use locker_core::report::{InventoryRow, SalesHistoryRow, SalesSummary};

/// Repository for aggregates and export rows.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Revenue, profit (against current cost) and sale count.
    pub async fn summary(&self) -> DbResult<SalesSummary> {
        let (total_revenue_cents, total_profit_cents, sale_count): (i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT COALESCE(SUM(s.revenue_cents), 0),
                       COALESCE(SUM(s.revenue_cents - v.cost_cents * s.quantity), 0),
                       COUNT(s.id)
                FROM sales s
                INNER JOIN variants v ON v.id = s.variant_id
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(SalesSummary {
            total_revenue_cents,
            total_profit_cents,
            sale_count,
        })
    }

    /// Every sale with labels and current unit cost, newest first.
    pub async fn sales_history(&self) -> DbResult<Vec<SalesHistoryRow>> {
        let rows = sqlx::query_as::<_, SalesHistoryRow>(
            r#"
            SELECT s.id AS sale_id, p.name AS product_name, v.variant_type, v.size,
                   s.quantity, s.revenue_cents, v.cost_cents, s.sold_at
            FROM sales s
            INNER JOIN variants v ON v.id = s.variant_id
            INNER JOIN products p ON p.id = v.product_id
            ORDER BY s.sold_at DESC, s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One row per variant, grouped by product.
    pub async fn inventory(&self) -> DbResult<Vec<InventoryRow>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT p.name AS product_name, v.variant_type, v.size, v.barcode,
                   v.cost_cents, v.selling_price_cents, v.stock
            FROM variants v
            INNER JOIN products p ON p.id = v.product_id
            ORDER BY p.name, p.id, v.variant_type, v.size, v.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
