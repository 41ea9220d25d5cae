// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shopping cart endpoints.
//!
//! Every authenticated user owns at most one cart, created lazily on the
//! first add. All three endpoints return the full cart after the operation
//! so the client never has to reconcile deltas.

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::repository::{CartRepository, StoredCart},
};

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartAddRequest {
    #[serde(default)]
    pub product_id: String,
    /// Quantity to add; defaults to 1 when omitted
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartRemoveRequest {
    #[serde(default)]
    pub product_id: String,
}

#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's cart (empty if never used)", body = StoredCart),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_cart(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<StoredCart>, ApiError> {
    let repo = CartRepository::new(&state.storage);
    let cart = repo
        .get_or_empty(&user.user_id)
        .map_err(super::internal_error)?;

    Ok(Json(cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    tag = "Cart",
    request_body = CartAddRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated cart", body = StoredCart),
        (status = 400, description = "Missing product id or zero quantity"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn add_to_cart(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CartAddRequest>,
) -> Result<Json<StoredCart>, ApiError> {
    if request.product_id.is_empty() {
        return Err(ApiError::bad_request("productId required"));
    }
    if request.quantity == 0 {
        return Err(ApiError::bad_request("quantity must be at least 1"));
    }

    let repo = CartRepository::new(&state.storage);
    let cart = repo
        .add_item(&user.user_id, &request.product_id, request.quantity)
        .map_err(super::internal_error)?;

    Ok(Json(cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove",
    tag = "Cart",
    request_body = CartRemoveRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated cart", body = StoredCart),
        (status = 400, description = "Missing product id"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn remove_from_cart(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CartRemoveRequest>,
) -> Result<Json<StoredCart>, ApiError> {
    if request.product_id.is_empty() {
        return Err(ApiError::bad_request("productId required"));
    }

    let repo = CartRepository::new(&state.storage);
    let cart = repo
        .remove_item(&user.user_id, &request.product_id)
        .map_err(super::internal_error)?;

    Ok(Json(cart))
}
