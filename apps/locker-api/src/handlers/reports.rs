//! Reporting view and CSV export.

use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::export::csv_response;
use crate::state::AppState;
use locker_core::report::{inventory_sheet, sales_sheet, SalesHistoryRow, SalesSummary};

/// `GET /reports/summary`
pub async fn summary(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Json<SalesSummary>> {
    Ok(Json(state.db.reports().summary().await?))
}

/// `GET /reports/sales`
pub async fn sales(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<SalesHistoryRow>>> {
    Ok(Json(state.db.reports().sales_history().await?))
}

/// `GET /export/inventory`
pub async fn export_inventory(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Response> {
    let rows = state.db.reports().inventory().await?;
    csv_response(&inventory_sheet(&rows))
}

/// `GET /export/sales`
pub async fn export_sales(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Response> {
    let rows = state.db.reports().sales_history().await?;
    csv_response(&sales_sheet(&rows))
}
