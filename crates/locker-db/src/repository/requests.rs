//! # Request Repository
//!
//! Customer requests and pre-orders for out-of-stock variants.
//!
//! Both are informational records: created from the public forms, listed for
//! staff, removed only when their variant is deleted. Repeated submissions
//! for the same customer and variant are all kept.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::ledger::LedgerRepository;
use locker_core::validation::{validate_contact, validate_quantity};
use locker_core::{
    ContactDetails, CustomerRequest, CustomerRequestView, PreOrder, PreOrderView,
    RequestsOverview,
};

/// Repository for customer requests and pre-orders.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: SqlitePool,
}

impl RequestRepository {
    /// Creates a new RequestRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RequestRepository { pool }
    }

    /// Records a "tell me when it's back" request.
    pub async fn create_customer_request(
        &self,
        variant_id: &str,
        details: &ContactDetails,
    ) -> DbResult<CustomerRequest> {
        validate_contact(details)?;

        let request = CustomerRequest {
            id: Uuid::new_v4().to_string(),
            variant_id: variant_id.to_string(),
            customer_name: details.customer_name.trim().to_string(),
            contact_info: details.contact_info.trim().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO customer_requests (id, variant_id, customer_name, contact_info, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&request.id)
        .bind(&request.variant_id)
        .bind(&request.customer_name)
        .bind(&request.contact_info)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_missing_parent("Variant", variant_id))?;

        debug!(id = %request.id, variant_id = %variant_id, "Customer request recorded");
        Ok(request)
    }

    /// Records a pre-order of `quantity` units (1..=999).
    pub async fn create_pre_order(
        &self,
        variant_id: &str,
        details: &ContactDetails,
        quantity: i64,
    ) -> DbResult<PreOrder> {
        validate_contact(details)?;
        validate_quantity(quantity)?;

        let pre_order = PreOrder {
            id: Uuid::new_v4().to_string(),
            variant_id: variant_id.to_string(),
            customer_name: details.customer_name.trim().to_string(),
            contact_info: details.contact_info.trim().to_string(),
            quantity,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO pre_orders (id, variant_id, customer_name, contact_info, quantity, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&pre_order.id)
        .bind(&pre_order.variant_id)
        .bind(&pre_order.customer_name)
        .bind(&pre_order.contact_info)
        .bind(pre_order.quantity)
        .bind(pre_order.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_missing_parent("Variant", variant_id))?;

        debug!(id = %pre_order.id, variant_id = %variant_id, quantity, "Pre-order recorded");
        Ok(pre_order)
    }

    /// All customer requests, newest first.
    pub async fn list_customer_requests(&self) -> DbResult<Vec<CustomerRequestView>> {
        let rows = sqlx::query_as::<_, CustomerRequestView>(
            r#"
            SELECT r.id, r.variant_id, p.name AS product_name, v.variant_type, v.size,
                   r.customer_name, r.contact_info, r.created_at
            FROM customer_requests r
            INNER JOIN variants v ON v.id = r.variant_id
            INNER JOIN products p ON p.id = v.product_id
            ORDER BY r.created_at DESC, r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All pre-orders, newest first.
    pub async fn list_pre_orders(&self) -> DbResult<Vec<PreOrderView>> {
        let rows = sqlx::query_as::<_, PreOrderView>(
            r#"
            SELECT o.id, o.variant_id, p.name AS product_name, v.variant_type, v.size,
                   o.customer_name, o.contact_info, o.quantity, o.created_at
            FROM pre_orders o
            INNER JOIN variants v ON v.id = o.variant_id
            INNER JOIN products p ON p.id = v.product_id
            ORDER BY o.created_at DESC, o.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Customer requests, pending purchases and pre-orders in one view.
    pub async fn overview(&self) -> DbResult<RequestsOverview> {
        Ok(RequestsOverview {
            customer_requests: self.list_customer_requests().await?,
            purchases: LedgerRepository::new(self.pool.clone()).list_pending().await?,
            pre_orders: self.list_pre_orders().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{jersey, test_db};

    fn sam() -> ContactDetails {
        ContactDetails {
            customer_name: "Sam".to_string(),
            contact_info: "sam@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_customer_request_resubmission_keeps_both() {
        let db = test_db().await;
        let v = jersey(&db, "123456790", 0).await;

        db.requests().create_customer_request(&v.id, &sam()).await.unwrap();
        db.requests().create_customer_request(&v.id, &sam()).await.unwrap();

        let rows = db.requests().list_customer_requests().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Team Jersey");
        assert_eq!(rows[0].contact_info, "sam@example.com");
    }

    #[tokio::test]
    async fn test_pre_order_validation() {
        let db = test_db().await;
        let v = jersey(&db, "123456790", 0).await;

        let order = db.requests().create_pre_order(&v.id, &sam(), 2).await.unwrap();
        assert_eq!(order.quantity, 2);

        assert!(matches!(
            db.requests().create_pre_order(&v.id, &sam(), 0).await,
            Err(DbError::Validation(_))
        ));

        let blank = ContactDetails {
            customer_name: " ".to_string(),
            contact_info: "x".to_string(),
        };
        assert!(db.requests().create_pre_order(&v.id, &blank, 1).await.is_err());
        assert!(db.requests().create_customer_request(&v.id, &blank).await.is_err());

        assert!(matches!(
            db.requests().create_pre_order("missing", &sam(), 1).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(db.requests().list_pre_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overview_and_cascade() {
        let db = test_db().await;
        let v = jersey(&db, "123456790", 0).await;

        db.requests().create_customer_request(&v.id, &sam()).await.unwrap();
        db.requests().create_pre_order(&v.id, &sam(), 3).await.unwrap();
        db.ledger().request_restock(&v.id, 10).await.unwrap();

        let overview = db.requests().overview().await.unwrap();
        assert_eq!(overview.customer_requests.len(), 1);
        assert_eq!(overview.pre_orders.len(), 1);
        assert_eq!(overview.purchases.len(), 1);

        db.catalog().delete_variant(&v.id).await.unwrap();

        let overview = db.requests().overview().await.unwrap();
        assert!(overview.customer_requests.is_empty());
        assert!(overview.pre_orders.is_empty());
        assert!(overview.purchases.is_empty());
    }
}
