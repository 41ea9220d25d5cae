// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a single service-wide secret. There is
//! no key rotation and no external issuer; the service that mints a token is
//! the only party that ever verifies it.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{AuthenticatedUser, SessionClaims};
use super::error::AuthError;
use super::roles::Role;

/// Session token lifetime in seconds (seven days).
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Clock skew leeway in seconds for `exp` validation.
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Mints and verifies session tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the shared signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        // Session tokens carry no audience claim
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a signed session token for the given account.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            role,
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("token signing failed: {e}")))
    }

    /// Verify a session token and extract the authenticated user.
    ///
    /// Every failure (bad signature, malformed token, expired beyond leeway)
    /// maps to [`AuthError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::from_claims(token_data.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify() {
        let service = TokenService::new("test-secret");
        let token = service.issue("user_1", Role::User).unwrap();

        let user = service.verify(&token).unwrap();
        assert_eq!(user.user_id, "user_1");
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn issued_tokens_carry_admin_role() {
        let service = TokenService::new("test-secret");
        let token = service.issue("admin_1", Role::Admin).unwrap();

        let user = service.verify(&token).unwrap();
        assert!(user.is_admin());
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let service = TokenService::new("test-secret");
        let token = service.issue("user_1", Role::User).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(matches!(
            service.verify(&tampered),
            Err(AuthError::InvalidToken)
        ));

        assert!(matches!(
            service.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let minting = TokenService::new("secret-a");
        let verifying = TokenService::new("secret-b");

        let token = minting.issue("user_1", Role::User).unwrap();
        assert!(matches!(
            verifying.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let service = TokenService::new("test-secret");

        // Mint a token whose exp is well past the 60s leeway window.
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "user_1".to_string(),
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expiry_within_leeway_still_verifies() {
        let service = TokenService::new("test-secret");

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "user_1".to_string(),
            role: Role::User,
            iat: now - 600,
            exp: now - 10,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.verify(&token).is_ok());
    }
}
