//! Scan, sell, restock, and the purchase approval queue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{AdminUser, AuthUser};
use crate::config::RequestLinks;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use locker_core::{PendingPurchase, Purchase, Sale, SellOutcome, Variant};

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub barcode: String,
}

/// A scanned variant. Sold-out variants also carry the request links.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub product_name: String,
    pub variant: Variant,
    pub photo_url: String,
    #[serde(flatten)]
    pub links: Option<RequestLinks>,
}

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub variant_id: String,
    /// Amount actually charged; may differ from the list price.
    pub revenue_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct SellResponse {
    pub sale: Sale,
    pub new_stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub variant_id: String,
    pub quantity: i64,
}

/// `POST /scan`
pub async fn scan(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<ScanRequest>,
) -> ApiResult<Json<ScanResponse>> {
    let found = state.db.catalog().find_by_barcode(&req.barcode).await?;

    let links = found
        .variant
        .is_out_of_stock()
        .then(|| state.config.request_links(&found.variant.id));

    Ok(Json(ScanResponse {
        photo_url: state.config.photo_url(&found.variant.photo),
        product_name: found.product_name,
        variant: found.variant,
        links,
    }))
}

/// `POST /transactions/sell`
///
/// Takes exactly one unit. A sold-out variant answers 409 `OUT_OF_STOCK`
/// with the contact and pre-order links, and nothing is recorded.
pub async fn sell(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SellRequest>,
) -> ApiResult<Json<SellResponse>> {
    match state.db.ledger().sell(&req.variant_id, req.revenue_cents).await? {
        SellOutcome::Sold { sale, new_stock } => {
            info!(
                by = %user.session.username,
                variant_id = %sale.variant_id,
                revenue_cents = sale.revenue_cents,
                new_stock,
                "Sale recorded"
            );
            Ok(Json(SellResponse { sale, new_stock }))
        }
        SellOutcome::OutOfStock { variant_id } => {
            info!(variant_id = %variant_id, "Sell refused, out of stock");
            Err(ApiError::out_of_stock(state.config.request_links(&variant_id)))
        }
    }
}

/// `POST /transactions/restock`
pub async fn restock(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<RestockRequest>,
) -> ApiResult<(StatusCode, Json<Purchase>)> {
    let purchase = state
        .db
        .ledger()
        .request_restock(&req.variant_id, req.quantity)
        .await?;

    info!(
        by = %user.session.username,
        purchase_id = %purchase.id,
        quantity = purchase.quantity,
        "Restock requested"
    );
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// `GET /purchases`
pub async fn list_pending(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<PendingPurchase>>> {
    Ok(Json(state.db.ledger().list_pending().await?))
}

/// `POST /purchases/{id}/approve`
///
/// Applies the quantity to stock and removes the purchase. A purchase can
/// only be approved once; the second attempt is `NOT_FOUND`.
pub async fn approve(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Variant>> {
    let variant = state.db.ledger().approve(&id).await?;

    info!(by = %admin.username, purchase_id = %id, stock = variant.stock, "Purchase approved");
    Ok(Json(variant))
}

/// `POST /purchases/{id}/reject`
pub async fn reject(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.ledger().reject(&id).await?;

    info!(by = %admin.username, purchase_id = %id, "Purchase rejected");
    Ok(StatusCode::NO_CONTENT)
}
