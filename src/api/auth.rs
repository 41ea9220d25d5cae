// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup, OTP verification, login and session introspection.
//!
//! Accounts are addressed by a single `identifier` string (email or phone,
//! classified by `@`). Registration leaves the account unverified until the
//! one-time code is confirmed; login on an unverified account re-issues the
//! code instead of returning a session token.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::otp::{self, OtpError},
    auth::{identifier, password, Auth, ClientMeta, Identifier, Role},
    error::ApiError,
    state::AppState,
    storage::audit::AuditEventType,
    storage::repository::{StoredUser, UserProfile, UserRepository, UserResponse},
    storage::StorageError,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckRequest {
    /// Email address or phone number
    #[serde(default)]
    pub identifier: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckResponse {
    pub exists: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Date of birth (ISO date)
    pub dob: Option<NaiveDate>,
    pub keep_logged_in: Option<bool>,
}

/// Acknowledgement for operations whose real result travels out of band.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResendOtpRequest {
    #[serde(default)]
    pub identifier: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// Successful authentication: a session token plus the public profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Signed session token (also accepted as the `token` cookie)
    pub token: String,
    pub user: UserProfile,
}

/// Login outcome for accounts that still need OTP verification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequireOtpResponse {
    pub require_otp: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/check",
    request_body = CheckRequest,
    tag = "Auth",
    responses(
        (status = 200, body = CheckResponse),
        (status = 400, description = "Identifier missing or unclassifiable")
    )
)]
pub async fn check(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let identifier = Identifier::parse(&request.identifier)
        .ok_or_else(|| ApiError::bad_request("Identifier required"))?;

    let repo = UserRepository::new(&state.storage);
    let exists = match repo.find_by_identifier(&identifier) {
        Ok(_) => true,
        Err(StorageError::NotFound(_)) => false,
        Err(e) => return Err(super::internal_error(e)),
    };

    Ok(Json(CheckResponse { exists }))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Account created, OTP issued", body = AckResponse),
        (status = 400, description = "Missing fields or duplicate identifier")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let name = request.name.trim().to_string();
    let email = request
        .email
        .as_deref()
        .map(identifier::normalize_email)
        .filter(|e| !e.is_empty());
    let phone = request
        .phone
        .as_deref()
        .map(identifier::normalize_phone)
        .filter(|p| !p.is_empty());

    // At least one identifier must survive normalization
    if name.is_empty() || request.password.is_empty() || (email.is_none() && phone.is_none()) {
        return Err(ApiError::bad_request(
            "name, password and email/phone required",
        ));
    }

    let password_hash = password::hash_password(&request.password).map_err(super::internal_error)?;

    let mut user = StoredUser {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        email,
        phone,
        password_hash,
        role: Role::default(),
        verified: false,
        otp: None,
        otp_expires: None,
        dob: request.dob,
        keep_logged_in: request.keep_logged_in,
        created_at: Utc::now(),
    };
    issue_and_log_otp(&mut user);

    let repo = UserRepository::new(&state.storage);
    match repo.create(&user) {
        Ok(()) => {}
        Err(StorageError::AlreadyExists(_)) => {
            return Err(ApiError::bad_request("User already exists"))
        }
        Err(e) => return Err(super::internal_error(e)),
    }

    audit_log!(&state.storage, AuditEventType::SignupStart, &user.id, client);

    Ok(Json(AckResponse {
        ok: true,
        message: "OTP sent".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Account verified, session issued", body = SessionResponse),
        (status = 400, description = "Code missing, expired or wrong"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let identifier = Identifier::parse(&request.identifier)
        .ok_or_else(|| ApiError::bad_request("Identifier required"))?;

    let repo = UserRepository::new(&state.storage);
    let mut user = match repo.find_by_identifier(&identifier) {
        Ok(user) => user,
        Err(StorageError::NotFound(_)) => return Err(ApiError::not_found("User not found")),
        Err(e) => return Err(super::internal_error(e)),
    };

    match user.verify_otp(&request.otp, Utc::now()) {
        Ok(()) => {}
        Err(OtpError::Missing) => return Err(ApiError::bad_request("OTP not present")),
        Err(OtpError::Expired) => return Err(ApiError::bad_request("OTP expired")),
        Err(OtpError::Invalid) => return Err(ApiError::bad_request("OTP invalid")),
    }

    repo.update(&user).map_err(super::internal_error)?;

    audit_log!(
        &state.storage,
        AuditEventType::SignupVerified,
        &user.id,
        client
    );

    let token = state
        .tokens
        .issue(&user.id, user.role)
        .map_err(super::internal_error)?;

    Ok(Json(SessionResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/resend-otp",
    request_body = ResendOtpRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Fresh code issued", body = AckResponse),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let identifier = Identifier::parse(&request.identifier)
        .ok_or_else(|| ApiError::bad_request("Identifier required"))?;

    let repo = UserRepository::new(&state.storage);
    let mut user = match repo.find_by_identifier(&identifier) {
        Ok(user) => user,
        Err(StorageError::NotFound(_)) => return Err(ApiError::not_found("User not found")),
        Err(e) => return Err(super::internal_error(e)),
    };

    // A resend always supersedes any pending code
    issue_and_log_otp(&mut user);
    repo.update(&user).map_err(super::internal_error)?;

    Ok(Json(AckResponse {
        ok: true,
        message: "OTP resent".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session issued, or OTP verification still required", body = SessionResponse),
        (status = 400, description = "Missing fields or unknown account"),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let identifier = match Identifier::parse(&request.identifier) {
        Some(id) if !request.password.is_empty() => id,
        _ => return Err(ApiError::bad_request("Identifier and password required")),
    };

    let repo = UserRepository::new(&state.storage);
    let mut user = match repo.find_by_identifier(&identifier) {
        Ok(user) => user,
        // Login reports an unknown account as a client error, not a 404
        Err(StorageError::NotFound(_)) => return Err(ApiError::bad_request("User not found")),
        Err(e) => return Err(super::internal_error(e)),
    };

    if !password::verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if !user.verified {
        // Lazy issuance: mint a fresh code only when none is pending
        if !user.has_valid_otp(Utc::now()) {
            issue_and_log_otp(&mut user);
            repo.update(&user).map_err(super::internal_error)?;
        } else {
            log_otp_delivery(&user);
        }

        return Ok(Json(RequireOtpResponse {
            require_otp: true,
            message: "Please verify your account via OTP".to_string(),
        })
        .into_response());
    }

    audit_log!(&state.storage, AuditEventType::Login, &user.id, client);

    let token = state
        .tokens
        .issue(&user.id, user.role)
        .map_err(super::internal_error)?;

    Ok(Json(SessionResponse {
        token,
        user: UserProfile::from(&user),
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    Auth(session): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let user = match repo.get(&session.user_id) {
        Ok(user) => user,
        Err(StorageError::NotFound(_)) => return Err(ApiError::not_found("User not found")),
        Err(e) => return Err(super::internal_error(e)),
    };

    Ok(Json(UserResponse::from(&user)))
}

/// Issue a fresh one-time code and emit its delivery log line.
fn issue_and_log_otp(user: &mut StoredUser) {
    let code = otp::generate();
    user.issue_otp(code, Utc::now() + otp::ttl());
    log_otp_delivery(user);
}

/// Side-channel delivery: the code goes to the log, never into a response.
fn log_otp_delivery(user: &StoredUser) {
    let destination = user
        .email
        .as_deref()
        .or(user.phone.as_deref())
        .unwrap_or(&user.id);
    if let Some(code) = &user.otp {
        tracing::info!(destination = %destination, code = %code, "OTP issued");
    }
}
