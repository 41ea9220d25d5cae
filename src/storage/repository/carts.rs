// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cart repository for the document store.
//!
//! Each user owns at most one cart, stored under `carts/{user_id}.json` and
//! created lazily on the first add. Reads of a missing cart yield an empty
//! cart without persisting anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{FileStorage, StorageResult};

/// A single cart line item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product referenced by this line item
    pub product_id: String,
    /// Requested quantity, always at least 1
    pub quantity: u32,
}

/// Cart document, one per user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCart {
    /// Owning user id
    pub user_id: String,
    /// Line items in insertion order
    pub items: Vec<CartItem>,
    /// When the cart was created
    pub created_at: DateTime<Utc>,
    /// When the cart was last modified
    pub updated_at: DateTime<Utc>,
}

impl StoredCart {
    /// An empty, not-yet-persisted cart for the given user.
    pub fn empty(user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository for cart operations on the document store.
pub struct CartRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> CartRepository<'a> {
    /// Create a new CartRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Get a user's cart, or an empty cart if none exists yet.
    ///
    /// Never creates the cart document.
    pub fn get_or_empty(&self, user_id: &str) -> StorageResult<StoredCart> {
        let path = self.storage.paths().cart(user_id);
        if !self.storage.exists(&path) {
            return Ok(StoredCart::empty(user_id));
        }
        self.storage.read_json(path)
    }

    /// Add a product to the user's cart, creating the cart if needed.
    ///
    /// Adding a product already in the cart increments that line item's
    /// quantity instead of appending a second one. This is a plain
    /// read-modify-write; concurrent calls for the same user are
    /// last-write-wins.
    pub fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> StorageResult<StoredCart> {
        let mut cart = self.get_or_empty(user_id)?;

        match cart.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => cart.items.push(CartItem {
                product_id: product_id.to_string(),
                quantity,
            }),
        }

        cart.updated_at = Utc::now();
        self.storage
            .write_json(self.storage.paths().cart(user_id), &cart)?;
        Ok(cart)
    }

    /// Remove a product's line item from the user's cart.
    ///
    /// Removing from a missing cart is a no-op returning an empty cart.
    pub fn remove_item(&self, user_id: &str, product_id: &str) -> StorageResult<StoredCart> {
        let path = self.storage.paths().cart(user_id);
        if !self.storage.exists(&path) {
            return Ok(StoredCart::empty(user_id));
        }

        let mut cart: StoredCart = self.storage.read_json(&path)?;
        cart.items.retain(|i| i.product_id != product_id);
        cart.updated_at = Utc::now();

        self.storage.write_json(&path, &cart)?;
        Ok(cart)
    }
}
