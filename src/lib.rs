// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Shop - E-commerce Backend Service
//!
//! JSON API for the shop frontend: OTP-verified signup/login, HS256 session
//! tokens, a product catalog with admin CRUD, per-user shopping carts, and
//! an append-only audit log.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Identifiers, passwords, OTP codes, session tokens, extractors
//! - `storage` - File-backed JSON document store and repositories
//! - `config` - Environment variable names and defaults
//! - `state` - Shared application state
//! - `error` - HTTP error envelope

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
