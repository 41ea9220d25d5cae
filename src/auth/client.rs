// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client identification for audit logging.
//!
//! Best-effort capture of the caller's IP address and User-Agent. Neither
//! value is trusted for authorization; they only annotate audit events.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};

/// Request metadata recorded alongside audit events.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    /// Client IP address (from X-Forwarded-For or the direct connection)
    pub ip: Option<String>,
    /// Raw User-Agent header value
    pub user_agent: Option<String>,
}

/// Extract the client IP address from headers.
///
/// Checks the X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to the direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // First entry in X-Forwarded-For is the originating client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let ip = extract_client_ip(&parts.headers, direct_ip).map(|ip| ip.to_string());

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|ua| ua.to_string());

        Ok(ClientMeta { ip, user_agent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn parts_for(builder: Request<()>) -> Parts {
        builder.into_parts().0
    }

    #[tokio::test]
    async fn prefers_forwarded_for_over_connection() {
        let mut parts = parts_for(Request::builder().uri("/test").body(()).unwrap());
        parts.headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        parts
            .extensions
            .insert(ConnectInfo::<SocketAddr>("127.0.0.1:9999".parse().unwrap()));

        let meta = ClientMeta::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(meta.ip.as_deref(), Some("192.168.1.1"));
    }

    #[tokio::test]
    async fn falls_back_to_connection_ip() {
        let mut parts = parts_for(Request::builder().uri("/test").body(()).unwrap());
        parts
            .extensions
            .insert(ConnectInfo::<SocketAddr>("127.0.0.1:9999".parse().unwrap()));

        let meta = ClientMeta::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(meta.ip.as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn garbage_forwarded_for_is_ignored() {
        let mut parts = parts_for(Request::builder().uri("/test").body(()).unwrap());
        parts
            .headers
            .insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));

        let meta = ClientMeta::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(meta.ip, None);
    }

    #[tokio::test]
    async fn captures_user_agent() {
        let mut parts = parts_for(Request::builder().uri("/test").body(()).unwrap());
        parts.headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 Test Browser"),
        );

        let meta = ClientMeta::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(meta.user_agent.as_deref(), Some("Mozilla/5.0 Test Browser"));
        assert_eq!(meta.ip, None);
    }
}
