// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wipes every user document from the store.
//!
//! Maintenance tool for resetting a test deployment. Products, carts and
//! audit logs are left untouched.

use std::env;

use relational_shop_server::{
    config,
    storage::{paths::DATA_ROOT, repository::UserRepository, FileStorage, StoragePaths},
};

fn main() {
    tracing_subscriber::fmt().init();

    let data_dir = env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| DATA_ROOT.to_string());
    let mut storage = FileStorage::new(StoragePaths::new(&data_dir));
    storage
        .initialize()
        .expect("Failed to initialize document store");

    let removed = UserRepository::new(&storage)
        .delete_all()
        .expect("Failed to delete user documents");

    println!("Deleted {removed} user document(s)");
}
