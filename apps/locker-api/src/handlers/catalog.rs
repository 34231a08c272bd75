//! Products, variants and variant photos.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth::{AdminUser, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use locker_core::validation::photo_extension;
use locker_core::{CatalogEntry, NewVariant, Variant};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub variants: Vec<NewVariant>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub stock: i64,
}

/// `GET /catalog`
pub async fn list_catalog(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<CatalogEntry>>> {
    Ok(Json(state.db.catalog().list_catalog().await?))
}

/// `POST /products`
///
/// The product and all its variants are created together or not at all.
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<CatalogEntry>)> {
    let entry = state
        .db
        .catalog()
        .create_product_with_variants(&req.name, &req.variants)
        .await?;

    info!(
        by = %admin.username,
        product_id = %entry.product.id,
        variants = entry.variants.len(),
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `DELETE /products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let released = state.db.catalog().delete_product(&id).await?;
    state.photos.release_all(&released).await;

    info!(by = %admin.username, product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /products/{id}/variants`
pub async fn create_variant(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(product_id): Path<String>,
    Json(draft): Json<NewVariant>,
) -> ApiResult<(StatusCode, Json<Variant>)> {
    let variant = state.db.catalog().create_variant(&product_id, &draft).await?;

    info!(by = %admin.username, variant_id = %variant.id, barcode = %variant.barcode, "Variant created");
    Ok((StatusCode::CREATED, Json(variant)))
}

/// `GET /variants/{id}`
pub async fn get_variant(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Variant>> {
    Ok(Json(state.db.catalog().get_variant(&id).await?))
}

/// `PUT /variants/{id}/stock`
pub async fn update_stock(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStockRequest>,
) -> ApiResult<Json<Variant>> {
    state.db.catalog().update_stock(&id, req.stock).await?;

    info!(by = %admin.username, variant_id = %id, stock = req.stock, "Stock set");
    Ok(Json(state.db.catalog().get_variant(&id).await?))
}

/// `DELETE /variants/{id}`
pub async fn delete_variant(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let released = state.db.catalog().delete_variant(&id).await?;
    state.photos.release_all(&released).await;

    info!(by = %admin.username, variant_id = %id, "Variant deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /variants/{id}/photo`
///
/// Takes the first multipart field that carries a file name. The file is
/// stored as `<variantId>.<ext>` and the previous photo, if any, is released.
pub async fn upload_photo(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<Variant>> {
    // Fail before touching the disk if the variant is gone.
    state.db.catalog().get_variant(&id).await?;

    let (file_name, bytes) = loop {
        let Some(field) = multipart.next_field().await? else {
            return Err(ApiError::validation("photo file is required"));
        };
        if let Some(file_name) = field.file_name().map(str::to_string) {
            break (file_name, field.bytes().await?);
        }
    };

    if bytes.is_empty() {
        return Err(ApiError::validation("photo file is empty"));
    }

    let photo = format!("{}.{}", id, photo_extension(&file_name)?);
    state.photos.save(&photo, &bytes).await?;

    if let Some(previous) = state.db.catalog().set_photo(&id, &photo).await? {
        state.photos.release(&previous).await;
    }

    info!(by = %admin.username, variant_id = %id, photo = %photo, "Photo uploaded");
    Ok(Json(state.db.catalog().get_variant(&id).await?))
}
