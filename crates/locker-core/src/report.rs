//! # Reporting View
//!
//! Aggregates derived from the sale ledger and the catalog, plus the
//! two-dimensional sheets used for export.
//!
//! ## Profit Semantics
//! ```text
//! profit = Σ (sale.revenue - variant.cost × sale.quantity)
//!                           ^^^^^^^^^^^^
//!                           CURRENT cost, joined at query time
//! ```
//! Editing a variant's cost later shifts the profit of its historical sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Timestamp layout used in exported sheets.
pub const SHEET_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Rows
// =============================================================================

/// One line of the inventory view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryRow {
    pub product_name: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
    pub barcode: String,
    pub cost_cents: i64,
    pub selling_price_cents: i64,
    pub stock: i64,
}

/// One line of the sales history view.
///
/// `cost_cents` is the variant's current unit cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesHistoryRow {
    pub sale_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub variant_type: String,
    pub size: String,
    pub quantity: i64,
    pub revenue_cents: i64,
    pub cost_cents: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

impl SalesHistoryRow {
    /// Profit of this sale against the current cost.
    pub fn profit(&self) -> Money {
        Money::from_cents(self.revenue_cents) - Money::from_cents(self.cost_cents) * self.quantity
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Ledger totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_revenue_cents: i64,
    pub total_profit_cents: i64,
    pub sale_count: i64,
}

impl SalesSummary {
    /// Folds a sales history into totals.
    ///
    /// ```rust
    /// use locker_core::report::SalesSummary;
    ///
    /// let empty = SalesSummary::from_history(&[]);
    /// assert_eq!(empty.sale_count, 0);
    /// assert_eq!(empty.total_revenue_cents, 0);
    /// ```
    pub fn from_history(rows: &[SalesHistoryRow]) -> Self {
        let revenue: Money = rows
            .iter()
            .map(|r| Money::from_cents(r.revenue_cents))
            .sum();
        let profit: Money = rows.iter().map(SalesHistoryRow::profit).sum();

        SalesSummary {
            total_revenue_cents: revenue.cents(),
            total_profit_cents: profit.cents(),
            sale_count: rows.len() as i64,
        }
    }

    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }

    pub fn total_profit(&self) -> Money {
        Money::from_cents(self.total_profit_cents)
    }
}

// =============================================================================
// Sheets
// =============================================================================

/// A titled table: one header row, then one row per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(title: &str, header: &[&str]) -> Self {
        Sheet {
            title: title.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Suggested download name, e.g. `sales_history.csv`.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.title.to_lowercase().replace(' ', "_"))
    }
}

/// Builds the "Inventory" sheet.
pub fn inventory_sheet(rows: &[InventoryRow]) -> Sheet {
    let mut sheet = Sheet::new(
        "Inventory",
        &[
            "Product Name",
            "Type",
            "Size",
            "Barcode",
            "Cost",
            "Selling Price",
            "Stock",
        ],
    );

    sheet.rows = rows
        .iter()
        .map(|r| {
            vec![
                r.product_name.clone(),
                r.variant_type.clone(),
                r.size.clone(),
                r.barcode.clone(),
                Money::from_cents(r.cost_cents).to_decimal_string(),
                Money::from_cents(r.selling_price_cents).to_decimal_string(),
                r.stock.to_string(),
            ]
        })
        .collect();

    sheet
}

/// Builds the "Sales History" sheet.
pub fn sales_sheet(rows: &[SalesHistoryRow]) -> Sheet {
    let mut sheet = Sheet::new(
        "Sales History",
        &[
            "Product Name",
            "Type",
            "Size",
            "Quantity",
            "Revenue",
            "Cost",
            "Sale Time",
        ],
    );

    sheet.rows = rows
        .iter()
        .map(|r| {
            vec![
                r.product_name.clone(),
                r.variant_type.clone(),
                r.size.clone(),
                r.quantity.to_string(),
                Money::from_cents(r.revenue_cents).to_decimal_string(),
                Money::from_cents(r.cost_cents).to_decimal_string(),
                r.sold_at.format(SHEET_TIME_FORMAT).to_string(),
            ]
        })
        .collect();

    sheet
}
