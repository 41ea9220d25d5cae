// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Store Module
//!
//! This module provides persistent storage as plain JSON files, one document
//! per file, under a configurable data root (`DATA_DIR`).
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//!   users/
//!     {user_id}.json       # Credential record (hash + OTP, never served raw)
//!   products/
//!     {product_id}.json    # Catalog item
//!   carts/
//!     {user_id}.json       # One cart per user, created lazily
//!   audit/
//!     {date}/events.jsonl  # Daily audit logs, append-only
//! ```
//!
//! ## Consistency Model
//!
//! - Document writes are atomic (temp file + rename)
//! - There is no cross-document locking; read-modify-write sequences are
//!   last-write-wins
//! - Secondary lookups (email, phone) are linear scans over the collection

pub mod audit;
pub mod fs;
pub mod paths;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    CartItem, CartRepository, ProductRepository, StoredCart, StoredProduct, StoredUser,
    UserProfile, UserRepository, UserResponse,
};
