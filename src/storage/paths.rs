// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the document store layout.

use std::path::{Path, PathBuf};

/// Base directory for all persistent storage.
/// Overridden via the `DATA_DIR` environment variable at startup.
pub const DATA_ROOT: &str = "data";

/// Storage path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user documents.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user document.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Product Paths ==========

    /// Directory containing all product documents.
    pub fn products_dir(&self) -> PathBuf {
        self.root.join("products")
    }

    /// Path to a specific product document.
    pub fn product(&self, product_id: &str) -> PathBuf {
        self.products_dir().join(format!("{product_id}.json"))
    }

    // ========== Cart Paths ==========

    /// Directory containing all cart documents.
    pub fn carts_dir(&self) -> PathBuf {
        self.root.join("carts")
    }

    /// Path to a specific cart document. Carts are keyed by their owning
    /// user id (one cart per user).
    pub fn cart(&self, user_id: &str) -> PathBuf {
        self.carts_dir().join(format!("{user_id}.json"))
    }

    // ========== Audit Log Paths ==========

    /// Directory containing audit logs.
    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// Directory for a specific date's audit logs.
    pub fn audit_date_dir(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date)
    }

    /// Path to a daily audit events file (JSONL format).
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_date_dir(date).join("events.jsonl")
    }
}
