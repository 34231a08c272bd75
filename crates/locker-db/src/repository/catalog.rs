//! # Catalog Repository
//!
//! Products, variants and the authoritative stock counts.
//!
//! ## Cascade
//! ```text
//! DELETE products(id)
//!    └─► variants          (ON DELETE CASCADE)
//!          ├─► sales
//!          ├─► purchases
//!          ├─► customer_requests
//!          └─► pre_orders
//! ```
//! Deletes return the photo references nobody points at anymore so the
//! caller can release the files once the transaction has committed.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use locker_core::validation::{
    validate_new_variant, validate_photo_ref, validate_product_name, validate_stock,
};
use locker_core::{
    CatalogEntry, NewVariant, Product, Variant, VariantLabel, VariantWithProduct,
    PLACEHOLDER_PHOTO,
};

const VARIANT_COLUMNS: &str = "id, product_id, barcode, variant_type, size, cost_cents, \
                               selling_price_cents, stock, photo, created_at";

/// Photo references released by a delete. Never contains the placeholder.
pub type ReleasedPhotos = Vec<String>;

/// Repository for products and variants.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product with no variants. Names need not be unique.
    pub async fn create_product(&self, name: &str) -> DbResult<Product> {
        validate_product_name(name)?;

        let mut conn = self.pool.acquire().await?;
        insert_product(&mut conn, name).await
    }

    /// Creates a product and all its variants in one transaction.
    ///
    /// Any invalid draft or taken barcode rolls back the whole product.
    pub async fn create_product_with_variants(
        &self,
        name: &str,
        drafts: &[NewVariant],
    ) -> DbResult<CatalogEntry> {
        validate_product_name(name)?;

        let mut seen = HashSet::new();
        for draft in drafts {
            validate_new_variant(draft)?;
            if !seen.insert(draft.barcode.trim()) {
                return Err(DbError::duplicate("barcode", draft.barcode.trim()));
            }
        }

        let mut tx = self.pool.begin().await?;

        let product = insert_product(&mut tx, name).await?;
        let mut variants = Vec::with_capacity(drafts.len());
        for draft in drafts {
            variants.push(insert_variant(&mut tx, &product.id, draft).await?);
        }

        tx.commit().await?;

        debug!(id = %product.id, variants = variants.len(), "Product created with variants");
        Ok(CatalogEntry { product, variants })
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>("SELECT id, name, created_at FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product, its variants and everything hanging off them.
    pub async fn delete_product(&self, id: &str) -> DbResult<ReleasedPhotos> {
        debug!(id = %id, "Deleting product");

        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the write lock from the start.
        let photos: Vec<String> =
            sqlx::query_scalar("DELETE FROM variants WHERE product_id = ?1 RETURNING photo")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        let released = unreferenced(&mut tx, photos).await?;
        tx.commit().await?;

        Ok(released)
    }

    /// Number of products, for seeding decisions.
    pub async fn count_products(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Variants
    // =========================================================================

    /// Creates a variant under an existing product.
    ///
    /// ## Errors
    /// - `Validation` for negative cost, price or stock
    /// - `UniqueViolation` if the barcode is taken
    /// - `NotFound` if the product doesn't exist
    pub async fn create_variant(&self, product_id: &str, draft: &NewVariant) -> DbResult<Variant> {
        validate_new_variant(draft)?;

        let mut conn = self.pool.acquire().await?;
        insert_variant(&mut conn, product_id, draft).await
    }

    /// Gets a variant by ID.
    pub async fn get_variant(&self, id: &str) -> DbResult<Variant> {
        sqlx::query_as::<_, Variant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Variant", id))
    }

    /// Looks a variant up by barcode, with its product name.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<VariantWithProduct> {
        let barcode = barcode.trim();

        let variant = sqlx::query_as::<_, Variant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE barcode = ?1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Variant with barcode", barcode))?;

        let product_name: String = sqlx::query_scalar("SELECT name FROM products WHERE id = ?1")
            .bind(&variant.product_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Variant with barcode", barcode))?;

        Ok(VariantWithProduct {
            product_name,
            variant,
        })
    }

    /// Product name, type and size of a variant, for customer-facing forms.
    pub async fn describe_variant(&self, id: &str) -> DbResult<VariantLabel> {
        sqlx::query_as::<_, VariantLabel>(
            r#"
            SELECT v.id AS variant_id, p.name AS product_name, v.variant_type, v.size
            FROM variants v
            INNER JOIN products p ON p.id = v.product_id
            WHERE v.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Variant", id))
    }

    /// Overwrites the stock count.
    ///
    /// Last write wins; there is no concurrency token.
    pub async fn update_stock(&self, id: &str, new_stock: i64) -> DbResult<()> {
        validate_stock(new_stock)?;

        debug!(id = %id, stock = new_stock, "Overwriting stock");

        let result = sqlx::query("UPDATE variants SET stock = ?2 WHERE id = ?1")
            .bind(id)
            .bind(new_stock)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Variant", id));
        }

        Ok(())
    }

    /// Points a variant at a new photo.
    ///
    /// Returns the previous reference when it should be released: not the
    /// placeholder, not the new reference, and not used by another variant.
    pub async fn set_photo(&self, id: &str, photo: &str) -> DbResult<Option<String>> {
        validate_photo_ref(photo)?;

        let mut tx = self.pool.begin().await?;

        // Write first: a deferred transaction that reads before writing
        // cannot take the write lock after another writer commits.
        let previous: String =
            sqlx::query_scalar("UPDATE variants SET photo = photo WHERE id = ?1 RETURNING photo")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Variant", id))?;

        sqlx::query("UPDATE variants SET photo = ?2 WHERE id = ?1")
            .bind(id)
            .bind(photo)
            .execute(&mut *tx)
            .await?;

        let released = if previous == photo {
            None
        } else {
            unreferenced(&mut tx, vec![previous]).await?.pop()
        };

        tx.commit().await?;

        debug!(id = %id, photo = %photo, "Variant photo updated");
        Ok(released)
    }

    /// Deletes a variant and its sales, purchases, requests and pre-orders.
    pub async fn delete_variant(&self, id: &str) -> DbResult<ReleasedPhotos> {
        debug!(id = %id, "Deleting variant");

        let mut tx = self.pool.begin().await?;

        let photo: String = sqlx::query_scalar("DELETE FROM variants WHERE id = ?1 RETURNING photo")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Variant", id))?;

        let released = unreferenced(&mut tx, vec![photo]).await?;
        tx.commit().await?;

        Ok(released)
    }

    /// Every product with its variants, ordered by product id then variant id.
    pub async fn list_catalog(&self) -> DbResult<Vec<CatalogEntry>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, created_at FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let variants = sqlx::query_as::<_, Variant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants ORDER BY product_id, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut variants = variants.into_iter().peekable();
        let mut entries = Vec::with_capacity(products.len());

        // Both sides are sorted by product id.
        for product in products {
            let mut own = Vec::new();
            while let Some(v) = variants.next_if(|v| v.product_id <= product.id) {
                if v.product_id == product.id {
                    own.push(v);
                }
            }
            entries.push(CatalogEntry {
                product,
                variants: own,
            });
        }

        Ok(entries)
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn insert_product(conn: &mut SqliteConnection, name: &str) -> DbResult<Product> {
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        created_at: Utc::now(),
    };

    debug!(id = %product.id, name = %product.name, "Inserting product");

    sqlx::query("INSERT INTO products (id, name, created_at) VALUES (?1, ?2, ?3)")
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.created_at)
        .execute(&mut *conn)
        .await?;

    Ok(product)
}

/// Inserts an already validated draft.
async fn insert_variant(
    conn: &mut SqliteConnection,
    product_id: &str,
    draft: &NewVariant,
) -> DbResult<Variant> {
    let variant = Variant {
        id: Uuid::new_v4().to_string(),
        product_id: product_id.to_string(),
        barcode: draft.barcode.trim().to_string(),
        variant_type: draft.variant_type.trim().to_string(),
        size: draft.size.trim().to_string(),
        cost_cents: draft.cost_cents,
        selling_price_cents: draft.selling_price_cents,
        stock: draft.stock,
        photo: draft
            .photo
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_PHOTO.to_string()),
        created_at: Utc::now(),
    };

    debug!(id = %variant.id, product_id = %product_id, barcode = %variant.barcode, "Inserting variant");

    sqlx::query(&format!(
        "INSERT INTO variants ({VARIANT_COLUMNS}) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    ))
    .bind(&variant.id)
    .bind(&variant.product_id)
    .bind(&variant.barcode)
    .bind(&variant.variant_type)
    .bind(&variant.size)
    .bind(variant.cost_cents)
    .bind(variant.selling_price_cents)
    .bind(variant.stock)
    .bind(&variant.photo)
    .bind(variant.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        DbError::from(e)
            .on_unique("barcode", &variant.barcode)
            .on_missing_parent("Product", product_id)
    })?;

    Ok(variant)
}

/// Filters out the placeholder and photos still used by some variant.
async fn unreferenced(conn: &mut SqliteConnection, photos: Vec<String>) -> DbResult<ReleasedPhotos> {
    let mut released = Vec::new();

    for photo in photos {
        if photo == PLACEHOLDER_PHOTO || released.contains(&photo) {
            continue;
        }

        let still_used: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM variants WHERE photo = ?1")
            .bind(&photo)
            .fetch_one(&mut *conn)
            .await?;

        if still_used == 0 {
            released.push(photo);
        }
    }

    Ok(released)
}
