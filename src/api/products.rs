// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Catalog endpoints.
//!
//! Listing is public; create/update/delete require the admin role and each
//! mutation appends an audit event. The audit write is best-effort and
//! never rolls back the catalog change it describes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    audit_log,
    auth::{AdminOnly, ClientMeta},
    error::ApiError,
    state::AppState,
    storage::audit::AuditEventType,
    storage::repository::{ProductRepository, StoredProduct},
    storage::StorageError,
};

/// Query parameters for catalog listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Case-insensitive substring filter on the title
    pub q: Option<String>,
    /// Exact-match category filter
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    pub title: String,
    pub price: f64,
    pub mrp: Option<f64>,
    pub discount_percent: Option<f64>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub mrp: Option<f64>,
    pub discount_percent: Option<f64>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub ok: bool,
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching products, newest first", body = [StoredProduct])
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StoredProduct>>, ApiError> {
    let repo = ProductRepository::new(&state.storage);
    let products = repo
        .search(query.q.as_deref(), query.category.as_deref())
        .map_err(super::internal_error)?;

    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = StoredProduct),
        (status = 400, description = "Missing title"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    client: ClientMeta,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<StoredProduct>), ApiError> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title required"));
    }

    let now = Utc::now();
    let product = StoredProduct {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        price: request.price,
        mrp: request.mrp,
        discount_percent: request.discount_percent,
        rating: request.rating,
        image: request.image,
        category: request.category,
        created_at: now,
        updated_at: now,
    };

    let repo = ProductRepository::new(&state.storage);
    repo.create(&product).map_err(super::internal_error)?;

    audit_log!(
        &state.storage,
        AuditEventType::ProductCreated,
        &admin.user_id,
        client,
        serde_json::json!({ "productId": product.id })
    );

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{product_id}",
    tag = "Products",
    request_body = UpdateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = StoredProduct),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn update(
    AdminOnly(admin): AdminOnly,
    Path(product_id): Path<String>,
    State(state): State<AppState>,
    client: ClientMeta,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<StoredProduct>, ApiError> {
    let repo = ProductRepository::new(&state.storage);
    let mut product = match repo.get(&product_id) {
        Ok(product) => product,
        Err(StorageError::NotFound(_)) => return Err(ApiError::not_found("Product not found")),
        Err(e) => return Err(super::internal_error(e)),
    };

    if let Some(title) = request.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::bad_request("Title cannot be empty"));
        }
        product.title = title;
    }
    if let Some(price) = request.price {
        product.price = price;
    }
    if request.mrp.is_some() {
        product.mrp = request.mrp;
    }
    if request.discount_percent.is_some() {
        product.discount_percent = request.discount_percent;
    }
    if request.rating.is_some() {
        product.rating = request.rating;
    }
    if request.image.is_some() {
        product.image = request.image;
    }
    if request.category.is_some() {
        product.category = request.category;
    }
    product.updated_at = Utc::now();

    repo.update(&product).map_err(super::internal_error)?;

    audit_log!(
        &state.storage,
        AuditEventType::ProductUpdated,
        &admin.user_id,
        client,
        serde_json::json!({ "productId": product.id })
    );

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{product_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product deleted", body = DeletedResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn remove(
    AdminOnly(admin): AdminOnly,
    Path(product_id): Path<String>,
    State(state): State<AppState>,
    client: ClientMeta,
) -> Result<Json<DeletedResponse>, ApiError> {
    let repo = ProductRepository::new(&state.storage);
    match repo.delete(&product_id) {
        Ok(()) => {}
        Err(StorageError::NotFound(_)) => return Err(ApiError::not_found("Product not found")),
        Err(e) => return Err(super::internal_error(e)),
    }

    audit_log!(
        &state.storage,
        AuditEventType::ProductDeleted,
        &admin.user_id,
        client,
        serde_json::json!({ "productId": product_id })
    );

    Ok(Json(DeletedResponse { ok: true }))
}
