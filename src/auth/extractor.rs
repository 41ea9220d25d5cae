// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! The session token is read from the `token` cookie first, then from a
//! `Bearer` Authorization header. Browser clients ride on the cookie; API
//! clients and tests use the header.

use axum::{
    extract::FromRequestParts,
    http::{header, header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthenticatedUser, AuthError};
use crate::state::AppState;

/// Cookie that carries the session token.
pub const SESSION_COOKIE: &str = "token";

/// Extractor for authenticated users.
///
/// Verifies the session token and provides the authenticated user
/// information. Requests with no token are rejected with 401 before the
/// handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_cart(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<StoredCart>, ApiError> {
///     // user.user_id contains the authenticated user's ID
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        // Cookie takes precedence over the Authorization header
        let token = match extract_cookie(&parts.headers, SESSION_COOKIE) {
            Some(token) => token,
            None => {
                let auth_header = parts
                    .headers
                    .get(AUTHORIZATION)
                    .ok_or(AuthError::MissingToken)?
                    .to_str()
                    .map_err(|_| AuthError::InvalidAuthHeader)?;

                auth_header
                    .strip_prefix("Bearer ")
                    .ok_or(AuthError::InvalidAuthHeader)?
                    .to_string()
            }
        };

        let user = state.tokens.verify(&token)?;

        Ok(Auth(user))
    }
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` if no valid session is present, instead of rejecting.
/// Used by public endpoints that only personalize their response when the
/// caller happens to be signed in.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Try to authenticate, but don't fail if it doesn't work
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(user)) => Ok(OptionalAuth(Some(user))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

/// Pull a named cookie value out of the Cookie header.
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenService};
    use crate::state::AppState;
    use crate::storage::{FileStorage, StoragePaths};
    use axum::http::Request;
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = StoragePaths::new(temp_dir.path());
        let mut storage = FileStorage::new(paths);
        storage.initialize().expect("Failed to initialize storage");

        let state = AppState::new(storage, TokenService::new("extractor-test-secret"));
        (state, temp_dir)
    }

    fn empty_parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn auth_extractor_requires_a_token() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = empty_parts();

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn auth_extractor_accepts_bearer_token() {
        let (state, _temp_dir) = create_test_state();
        let token = state.tokens.issue("user_123", Role::User).unwrap();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {}", token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.user_id, "user_123");
    }

    #[tokio::test]
    async fn auth_extractor_accepts_session_cookie() {
        let (state, _temp_dir) = create_test_state();
        let token = state.tokens.issue("user_456", Role::User).unwrap();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Cookie", format!("theme=dark; token={}", token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.user_id, "user_456");
    }

    #[tokio::test]
    async fn cookie_takes_precedence_over_header() {
        let (state, _temp_dir) = create_test_state();
        let token = state.tokens.issue("cookie_user", Role::User).unwrap();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Cookie", format!("token={}", token))
            .header("Authorization", "Bearer garbage")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.user_id, "cookie_user");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_bad_tokens() {
        let (state, _temp_dir) = create_test_state();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer not-a-real-token")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_bearer_schemes() {
        let (state, _temp_dir) = create_test_state();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = empty_parts();

        let user = AuthenticatedUser {
            user_id: "user_from_middleware".to_string(),
            role: Role::Admin,
        };
        parts.extensions.insert(user);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.user_id, "user_from_middleware");
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = empty_parts();

        let user = AuthenticatedUser {
            user_id: "user_123".to_string(),
            role: Role::User, // Not admin
        };
        parts.extensions.insert(user);

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin_tokens() {
        let (state, _temp_dir) = create_test_state();
        let token = state.tokens.issue("admin_1", Role::Admin).unwrap();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {}", token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.user_id, "admin_1");
    }

    #[tokio::test]
    async fn optional_auth_returns_none_without_user() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = empty_parts();

        let result = OptionalAuth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert!(result.unwrap().0.is_none());
    }

    #[tokio::test]
    async fn optional_auth_returns_user_when_present() {
        let (state, _temp_dir) = create_test_state();
        let token = state.tokens.issue("user_789", Role::User).unwrap();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {}", token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(result.0.unwrap().user_id, "user_789");
    }
}
