// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only endpoints: user overview, role management and audit queries.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::{AdminOnly, ClientMeta, Role},
    error::ApiError,
    state::AppState,
    storage::audit::AuditEventType,
    storage::repository::{UserRepository, UserResponse},
    storage::{AuditEvent, AuditRepository, StorageError},
};

/// How many audit entries `GET /api/logs` returns at most.
const AUDIT_LOG_LIMIT: usize = 200;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    #[serde(default)]
    pub role: String,
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts, newest first", body = [UserResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let mut users = repo.list_all().map_err(super::internal_error)?;

    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let users = users.iter().map(UserResponse::from).collect();

    Ok(Json(users))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{user_id}/role",
    tag = "Admin",
    request_body = ChangeRoleRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 400, description = "Unknown role"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn change_role(
    AdminOnly(admin): AdminOnly,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    client: ClientMeta,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role = Role::from_str(&request.role)
        .ok_or_else(|| ApiError::bad_request("Role must be 'admin' or 'user'"))?;

    let repo = UserRepository::new(&state.storage);
    let mut user = match repo.get(&user_id) {
        Ok(user) => user,
        Err(StorageError::NotFound(_)) => return Err(ApiError::not_found("User not found")),
        Err(e) => return Err(super::internal_error(e)),
    };

    let previous = user.role;
    user.role = role;
    repo.update(&user).map_err(super::internal_error)?;

    audit_log!(
        &state.storage,
        AuditEventType::RoleChanged,
        &admin.user_id,
        client,
        serde_json::json!({
            "targetUserId": user.id,
            "from": previous.to_string(),
            "to": role.to_string(),
        })
    );

    Ok(Json(UserResponse::from(&user)))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Latest audit entries, newest first", body = [AuditEvent]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn recent_logs(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<AuditEvent>>, ApiError> {
    let repo = AuditRepository::new(&state.storage);
    let events = repo.recent(AUDIT_LOG_LIMIT).map_err(super::internal_error)?;

    Ok(Json(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, TokenService};
    use crate::storage::repository::StoredUser;
    use crate::storage::{FileStorage, StoragePaths};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = StoragePaths::new(temp_dir.path());
        let mut storage = FileStorage::new(paths);
        storage.initialize().expect("Failed to initialize storage");

        let state = AppState::new(storage, TokenService::new("admin-test-secret"));
        (state, temp_dir)
    }

    fn admin() -> AdminOnly {
        AdminOnly(AuthenticatedUser {
            user_id: "admin_1".to_string(),
            role: Role::Admin,
        })
    }

    fn seed_user(state: &AppState, id: &str, email: &str, age_days: i64) {
        UserRepository::new(&state.storage)
            .create(&StoredUser {
                id: id.to_string(),
                name: "Shopper".to_string(),
                email: Some(email.to_string()),
                phone: None,
                password_hash: "$argon2id$fake-hash".to_string(),
                role: Role::User,
                verified: true,
                otp: None,
                otp_expires: None,
                dob: None,
                keep_logged_in: None,
                created_at: Utc::now() - Duration::days(age_days),
            })
            .unwrap();
    }

    #[tokio::test]
    async fn list_users_is_sans_password_and_newest_first() {
        let (state, _temp_dir) = create_test_state();
        seed_user(&state, "older", "old@example.com", 2);
        seed_user(&state, "newer", "new@example.com", 0);

        let Json(users) = list_users(admin(), State(state)).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "newer");
        assert_eq!(users[1].id, "older");

        let json = serde_json::to_value(&users).unwrap();
        assert!(json[0].get("passwordHash").is_none());
        assert!(json[0].get("otp").is_none());
    }

    #[tokio::test]
    async fn change_role_promotes_and_audits() {
        let (state, _temp_dir) = create_test_state();
        seed_user(&state, "u-1", "shopper@example.com", 0);

        let Json(updated) = change_role(
            admin(),
            Path("u-1".to_string()),
            State(state.clone()),
            ClientMeta::default(),
            Json(ChangeRoleRequest {
                role: "admin".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Role::Admin);

        let stored = UserRepository::new(&state.storage).get("u-1").unwrap();
        assert_eq!(stored.role, Role::Admin);

        let events = AuditRepository::new(&state.storage).recent(10).unwrap();
        assert_eq!(events[0].event_type, AuditEventType::RoleChanged);
        let meta = events[0].meta.as_ref().unwrap();
        assert_eq!(meta["targetUserId"], "u-1");
        assert_eq!(meta["from"], "user");
        assert_eq!(meta["to"], "admin");
    }

    #[tokio::test]
    async fn change_role_rejects_unknown_roles() {
        let (state, _temp_dir) = create_test_state();
        seed_user(&state, "u-1", "shopper@example.com", 0);

        let err = change_role(
            admin(),
            Path("u-1".to_string()),
            State(state),
            ClientMeta::default(),
            Json(ChangeRoleRequest {
                role: "superuser".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn change_role_unknown_user_is_404() {
        let (state, _temp_dir) = create_test_state();

        let err = change_role(
            admin(),
            Path("ghost".to_string()),
            State(state),
            ClientMeta::default(),
            Json(ChangeRoleRequest {
                role: "user".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn recent_logs_caps_at_the_limit() {
        let (state, _temp_dir) = create_test_state();
        let repo = AuditRepository::new(&state.storage);
        for i in 0..(AUDIT_LOG_LIMIT + 25) {
            repo.log(
                &crate::storage::AuditEvent::new(AuditEventType::Login)
                    .with_user(format!("user_{i}")),
            )
            .unwrap();
        }

        let Json(events) = recent_logs(admin(), State(state)).await.unwrap();
        assert_eq!(events.len(), AUDIT_LOG_LIMIT);
        // Newest entry first
        assert_eq!(
            events[0].user_id,
            Some(format!("user_{}", AUDIT_LOG_LIMIT + 24))
        );
    }
}
