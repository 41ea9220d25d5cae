// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the FileStorage for all file operations.

pub mod carts;
pub mod products;
pub mod users;

pub use carts::{CartItem, CartRepository, StoredCart};
pub use products::{ProductRepository, StoredProduct};
pub use users::{StoredUser, UserProfile, UserRepository, UserResponse};
