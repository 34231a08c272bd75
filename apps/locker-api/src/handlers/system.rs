//! Asset retrieval and health.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::assets::PhotoStore;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /assets/{photo_ref}`
pub async fn get_asset(
    State(state): State<AppState>,
    Path(photo): Path<String>,
) -> ApiResult<Response> {
    let bytes = state.photos.read(&photo).await?;
    Ok(([(header::CONTENT_TYPE, PhotoStore::content_type(&photo))], bytes).into_response())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    if state.db.health_check().await {
        Json(json!({ "status": "ok" })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
            .into_response()
    }
}
