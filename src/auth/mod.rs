// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module provides OTP-verified account signup and HS256 session
//! tokens for the shop API.
//!
//! ## Auth Flow
//!
//! 1. Client registers with a name, password and an email or phone number
//! 2. Server issues a six-digit one-time code (logged, never returned)
//! 3. Client submits the code; the account flips to `verified`
//! 4. Login returns a signed session JWT, sent back on later requests as
//!    either a `token` cookie or `Authorization: Bearer <JWT>`
//! 5. Extractors verify the token and expose:
//!    - `sub` → canonical `user_id`
//!    - `role` → authorization level
//!
//! ## Security
//!
//! - Cart, profile and admin endpoints require authentication
//! - Passwords are stored as Argon2id hashes, never plaintext
//! - Token verification reports one opaque failure for every bad token
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod client;
pub mod error;
pub mod extractor;
pub mod identifier;
pub mod otp;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::AuthenticatedUser;
pub use client::ClientMeta;
pub use error::AuthError;
pub use extractor::{Auth, AdminOnly, OptionalAuth};
pub use identifier::Identifier;
pub use roles::Role;
pub use token::TokenService;
