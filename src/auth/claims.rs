// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and authenticated user representation.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims carried by a session token.
///
/// The service both mints and verifies these, so the set is intentionally
/// small: the registered `sub`/`iat`/`exp` claims plus the account role.
/// The role rides along only as a convenience for request handling; the
/// stored user document stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Role at the time the token was issued
    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated user information extracted from a session token.
///
/// This is the primary type used throughout the application to represent
/// the authenticated user making a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Canonical user ID (token `sub` claim)
    pub user_id: String,

    /// User's role
    pub role: Role,
}

impl AuthenticatedUser {
    /// Create from verified session claims.
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }

    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(role: Role) -> SessionClaims {
        SessionClaims {
            sub: "user_123".to_string(),
            role,
            iat: 1700000000,
            exp: 1700003600,
        }
    }

    #[test]
    fn from_claims_extracts_user_id() {
        let user = AuthenticatedUser::from_claims(sample_claims(Role::User));
        assert_eq!(user.user_id, "user_123");
    }

    #[test]
    fn from_claims_carries_role() {
        let user = AuthenticatedUser::from_claims(sample_claims(Role::Admin));
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn is_admin_only_for_admin_role() {
        assert!(AuthenticatedUser::from_claims(sample_claims(Role::Admin)).is_admin());
        assert!(!AuthenticatedUser::from_claims(sample_claims(Role::User)).is_admin());
    }

    #[test]
    fn claims_serialize_role_lowercase() {
        let json = serde_json::to_value(sample_claims(Role::Admin)).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["sub"], "user_123");
    }
}
