// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Idempotent bootstrap for a fresh deployment.
//!
//! Creates the admin account (unless one already holds the configured
//! email) and the demo catalog (unless any product exists). Safe to run
//! repeatedly.

use std::env;

use chrono::Utc;

use relational_shop_server::{
    auth::{password, Identifier, Role},
    config,
    storage::{
        paths::DATA_ROOT,
        repository::{ProductRepository, StoredProduct, StoredUser, UserRepository},
        FileStorage, StoragePaths, StorageError,
    },
};

fn main() {
    tracing_subscriber::fmt().init();

    let data_dir = env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| DATA_ROOT.to_string());
    let mut storage = FileStorage::new(StoragePaths::new(&data_dir));
    storage
        .initialize()
        .expect("Failed to initialize document store");

    seed_admin(&storage);
    seed_products(&storage);
}

fn seed_admin(storage: &FileStorage) {
    let email = env::var(config::SEED_ADMIN_EMAIL_ENV)
        .unwrap_or_else(|_| "admin@shop.local".to_string())
        .to_lowercase();
    let admin_password =
        env::var(config::SEED_ADMIN_PASSWORD_ENV).unwrap_or_else(|_| "Admin@123".to_string());

    let repo = UserRepository::new(storage);
    match repo.find_by_identifier(&Identifier::Email(email.clone())) {
        Ok(_) => {
            println!("Admin already exists: {email}");
            return;
        }
        Err(StorageError::NotFound(_)) => {}
        Err(e) => panic!("Failed to look up admin account: {e}"),
    }

    let password_hash = password::hash_password(&admin_password).expect("Failed to hash password");
    let admin = StoredUser {
        id: uuid::Uuid::new_v4().to_string(),
        name: "Admin".to_string(),
        email: Some(email.clone()),
        phone: None,
        password_hash,
        role: Role::Admin,
        verified: true,
        otp: None,
        otp_expires: None,
        dob: None,
        keep_logged_in: None,
        created_at: Utc::now(),
    };

    repo.create(&admin).expect("Failed to create admin account");
    println!("Admin created: {email}");
}

fn seed_products(storage: &FileStorage) {
    let repo = ProductRepository::new(storage);
    let existing = repo.search(None, None).expect("Failed to list catalog");
    if !existing.is_empty() {
        println!("Products already exist: {}", existing.len());
        return;
    }

    let demo: [(&str, f64, f64, f64, f64, &str, &str); 3] = [
        (
            "Aadi Black Casual Shoes",
            408.0,
            999.0,
            59.0,
            4.2,
            "https://images.unsplash.com/photo-1519741497674-611481863552?q=80&w=800&auto=format&fit=crop",
            "Men's Fashion",
        ),
        (
            "PU Tan Casual Wallet",
            150.0,
            1299.0,
            88.0,
            4.0,
            "https://images.unsplash.com/photo-1523359346063-d879354c0ea5?q=80&w=800&auto=format&fit=crop",
            "Men's Fashion",
        ),
        (
            "Kitchen Clever Cutter",
            132.0,
            499.0,
            74.0,
            4.1,
            "https://images.unsplash.com/photo-1565704471825-86e7b88b046e?q=80&w=800&auto=format&fit=crop",
            "Home & Kitchen",
        ),
    ];

    let now = Utc::now();
    for (title, price, mrp, discount_percent, rating, image, category) in demo {
        let product = StoredProduct {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            price,
            mrp: Some(mrp),
            discount_percent: Some(discount_percent),
            rating: Some(rating),
            image: Some(image.to_string()),
            category: Some(category.to_string()),
            created_at: now,
            updated_at: now,
        };
        repo.create(&product).expect("Failed to create demo product");
    }

    println!("Products seeded");
}
