// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the document store | `data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `JWT_SECRET` | Secret key for signing session tokens | Required |
//! | `CLIENT_ORIGIN` | Allowed CORS origin for the frontend | `http://localhost:3000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `SEED_ADMIN_EMAIL` | Admin account email for the `seed` binary | `admin@shop.local` |
//! | `SEED_ADMIN_PASSWORD` | Admin account password for the `seed` binary | `Admin@123` |

/// Environment variable name for the document store directory path.
///
/// All user, product, cart, and audit documents are stored under this
/// directory as JSON files.
///
/// # Default
/// `data` (relative to the working directory)
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the session token signing secret.
///
/// Required. The server refuses to start without it; there is no insecure
/// fallback value.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the allowed CORS origin.
///
/// The API serves exactly one browser origin with credentials enabled, so
/// a wildcard is never valid here.
///
/// # Default
/// `http://localhost:3000`
pub const CLIENT_ORIGIN_ENV: &str = "CLIENT_ORIGIN";

/// Environment variable name for the server bind address.
///
/// # Default
/// `0.0.0.0`
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
///
/// # Default
/// `5000`
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the logging output format.
///
/// `json` for structured output, anything else for human-readable.
///
/// # Default
/// `pretty`
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment variable name for the seeded admin account email.
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";

/// Environment variable name for the seeded admin account password.
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
