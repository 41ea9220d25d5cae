// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login identifier classification and normalization.
//!
//! Accounts are addressed by email or phone number. Raw client input is
//! classified by the presence of `@` and normalized so the same identifier
//! always compares equal regardless of casing or formatting:
//!
//! - emails are trimmed and lowercased
//! - phone numbers keep only their decimal digits (`+1 (555) 010-0000`
//!   becomes `15550100000`)

use std::fmt;

/// A normalized account identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Email(String),
    Phone(String),
}

impl Identifier {
    /// Classify and normalize a raw identifier string.
    ///
    /// Returns `None` when the input is empty after normalization, e.g. a
    /// blank string or a "phone number" with no digits in it.
    pub fn parse(raw: &str) -> Option<Identifier> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.contains('@') {
            Some(Identifier::Email(normalize_email(trimmed)))
        } else {
            let digits = normalize_phone(trimmed);
            if digits.is_empty() {
                return None;
            }
            Some(Identifier::Phone(digits))
        }
    }

    /// The normalized identifier value.
    pub fn value(&self) -> &str {
        match self {
            Identifier::Email(v) | Identifier::Phone(v) => v,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Normalize an email address (trim and lowercase).
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a phone number down to its decimal digits.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
