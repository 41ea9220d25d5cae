// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP API surface.
//!
//! All business routes live under `/api`; health probes and the Swagger UI
//! sit at the root. The CORS layer serves exactly one configured browser
//! origin with credentials enabled, since the session token may travel in
//! a cookie.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    error::ApiError,
    state::AppState,
    storage::{
        AuditEvent, AuditEventType, CartItem, StoredCart, StoredProduct, UserProfile, UserResponse,
    },
};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod products;

/// Log an unexpected failure and hide it behind a generic 500.
pub(crate) fn internal_error<E: std::fmt::Display>(e: E) -> ApiError {
    tracing::error!(error = %e, "request failed");
    ApiError::internal("Internal server error")
}

pub fn router(state: AppState, client_origin: HeaderValue) -> Router {
    let api_routes = Router::new()
        .route("/auth/check", post(auth::check))
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/resend-otp", post(auth::resend_otp))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{product_id}",
            put(products::update).delete(products::remove),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{user_id}/role", patch(admin::change_role))
        .route("/logs", get(admin::recent_logs))
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/remove", post(cart::remove_from_cart));

    let cors = CorsLayer::new()
        .allow_origin(client_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::check,
        auth::register,
        auth::verify_otp,
        auth::resend_otp,
        auth::login,
        auth::me,
        products::list,
        products::create,
        products::update,
        products::remove,
        admin::list_users,
        admin::change_role,
        admin::recent_logs,
        cart::get_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            auth::CheckRequest,
            auth::CheckResponse,
            auth::RegisterRequest,
            auth::AckResponse,
            auth::VerifyOtpRequest,
            auth::ResendOtpRequest,
            auth::LoginRequest,
            auth::SessionResponse,
            auth::RequireOtpResponse,
            products::CreateProductRequest,
            products::UpdateProductRequest,
            products::DeletedResponse,
            admin::ChangeRoleRequest,
            cart::CartAddRequest,
            cart::CartRemoveRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            StoredProduct,
            StoredCart,
            CartItem,
            UserProfile,
            UserResponse,
            AuditEvent,
            AuditEventType,
            Role
        )
    ),
    tags(
        (name = "Auth", description = "Signup, OTP verification and sessions"),
        (name = "Products", description = "Catalog listing and admin CRUD"),
        (name = "Cart", description = "Per-user shopping cart"),
        (name = "Admin", description = "User management and audit queries"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
