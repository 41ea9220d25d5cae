// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product repository for the document store.
//!
//! Each catalog item is stored as a separate JSON file under `products/`.
//! The stored document doubles as the API response shape, so its keys are
//! camelCase on disk as well.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{FileStorage, StorageError, StorageResult};

/// Catalog item document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredProduct {
    /// Unique product identifier (UUID)
    pub id: String,
    /// Display title
    pub title: String,
    /// Selling price
    pub price: f64,
    /// Maximum retail price, if different from the selling price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrp: Option<f64>,
    /// Discount percentage shown next to the price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    /// Average rating (0 to 5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Category name (exact-match filterable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// When the product was created
    pub created_at: DateTime<Utc>,
    /// When the product was last updated
    pub updated_at: DateTime<Utc>,
}

/// Repository for product operations on the document store.
pub struct ProductRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> ProductRepository<'a> {
    /// Create a new ProductRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a product exists.
    pub fn exists(&self, product_id: &str) -> bool {
        self.storage.exists(self.storage.paths().product(product_id))
    }

    /// Get a product by ID.
    pub fn get(&self, product_id: &str) -> StorageResult<StoredProduct> {
        let path = self.storage.paths().product(product_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Product {product_id}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new product.
    pub fn create(&self, product: &StoredProduct) -> StorageResult<()> {
        let product_id = &product.id;

        if self.exists(product_id) {
            return Err(StorageError::AlreadyExists(format!("Product {product_id}")));
        }

        self.storage
            .write_json(self.storage.paths().product(product_id), product)
    }

    /// Update an existing product.
    pub fn update(&self, product: &StoredProduct) -> StorageResult<()> {
        let product_id = &product.id;

        if !self.exists(product_id) {
            return Err(StorageError::NotFound(format!("Product {product_id}")));
        }

        self.storage
            .write_json(self.storage.paths().product(product_id), product)
    }

    /// Delete a product.
    pub fn delete(&self, product_id: &str) -> StorageResult<()> {
        if !self.exists(product_id) {
            return Err(StorageError::NotFound(format!("Product {product_id}")));
        }

        self.storage.delete(self.storage.paths().product(product_id))
    }

    /// Search the catalog.
    ///
    /// `query` filters by case-insensitive title substring, `category` by
    /// exact match. Results are sorted newest-first.
    pub fn search(
        &self,
        query: Option<&str>,
        category: Option<&str>,
    ) -> StorageResult<Vec<StoredProduct>> {
        let product_ids = self
            .storage
            .list_files(self.storage.paths().products_dir(), "json")?;

        let query_lower = query.map(str::to_lowercase);

        let mut products = Vec::new();
        for id in product_ids {
            if let Ok(product) = self.get(&id) {
                if let Some(q) = &query_lower {
                    if !product.title.to_lowercase().contains(q.as_str()) {
                        continue;
                    }
                }
                if let Some(cat) = category {
                    if product.category.as_deref() != Some(cat) {
                        continue;
                    }
                }
                products.push(product);
            }
        }

        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }
}
