//! Customer requests and pre-orders.
//!
//! The `public` handlers back the customer-facing forms linked from an
//! out-of-stock scan or sell; they need no session.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;
use locker_core::{ContactDetails, CustomerRequest, PreOrder, RequestsOverview, VariantLabel};

#[derive(Debug, Deserialize)]
pub struct PreOrderRequest {
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub quantity: i64,
}

/// `GET /requests`
pub async fn overview(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<RequestsOverview>> {
    Ok(Json(state.db.requests().overview().await?))
}

/// `GET /public/contact/{variant_id}` and `GET /public/pre-order/{variant_id}`
pub async fn describe_variant(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
) -> ApiResult<Json<VariantLabel>> {
    Ok(Json(state.db.catalog().describe_variant(&variant_id).await?))
}

/// `POST /public/contact/{variant_id}`
pub async fn submit_contact(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
    Json(details): Json<ContactDetails>,
) -> ApiResult<(StatusCode, Json<CustomerRequest>)> {
    let request = state
        .db
        .requests()
        .create_customer_request(&variant_id, &details)
        .await?;

    info!(request_id = %request.id, variant_id = %variant_id, "Customer request received");
    Ok((StatusCode::CREATED, Json(request)))
}

/// `POST /public/pre-order/{variant_id}`
pub async fn submit_pre_order(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
    Json(req): Json<PreOrderRequest>,
) -> ApiResult<(StatusCode, Json<PreOrder>)> {
    let pre_order = state
        .db
        .requests()
        .create_pre_order(&variant_id, &req.contact, req.quantity)
        .await?;

    info!(
        pre_order_id = %pre_order.id,
        variant_id = %variant_id,
        quantity = pre_order.quantity,
        "Pre-order received"
    );
    Ok((StatusCode::CREATED, Json(pre_order)))
}
