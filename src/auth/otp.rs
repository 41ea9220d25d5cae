// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-time codes for account verification.
//!
//! A code is a six-digit decimal string issued at registration (and on
//! login for accounts that never finished verifying). Codes expire after
//! [`OTP_TTL_MINUTES`] and are cleared from the account once consumed.

use chrono::Duration;
use rand::Rng;

/// How long an issued code stays valid.
pub const OTP_TTL_MINUTES: i64 = 10;

/// Validity window for a code issued now.
pub fn ttl() -> Duration {
    Duration::minutes(OTP_TTL_MINUTES)
}

/// Generate a six-digit one-time code.
pub fn generate() -> String {
    let code: u32 = rand::rng().random_range(100_000..=999_999);
    code.to_string()
}

/// Why consuming a one-time code failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    /// No code is currently issued for the account
    Missing,
    /// The code's validity window has passed
    Expired,
    /// The submitted code does not match the issued one
    Invalid,
}
