// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use relational_shop_server::{
    api,
    auth::TokenService,
    config,
    state::AppState,
    storage::{paths::DATA_ROOT, FileStorage, StoragePaths},
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Configuration is read here once and injected; nothing below main
    // touches the environment.
    let secret = env::var(config::JWT_SECRET_ENV)
        .unwrap_or_else(|_| panic!("{} must be set", config::JWT_SECRET_ENV));

    let origin = env::var(config::CLIENT_ORIGIN_ENV)
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let origin: HeaderValue = origin
        .parse()
        .unwrap_or_else(|_| panic!("{} is not a valid origin", config::CLIENT_ORIGIN_ENV));

    let data_dir = env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| DATA_ROOT.to_string());
    let mut storage = FileStorage::new(StoragePaths::new(&data_dir));
    storage
        .initialize()
        .expect("Failed to initialize document store");
    tracing::info!(data_dir = %data_dir, "document store ready");

    let state = AppState::new(storage, TokenService::new(&secret));
    let app = api::router(state, origin);

    let host = env::var(config::HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(config::PORT_ENV)
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .unwrap_or(5000);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "Relational Shop server listening (docs at /docs)");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server failed");
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var(config::LOG_FORMAT_ENV).as_deref() == Ok("json");
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
