//! Request middleware for the dev server

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{Instrument, Level, info, span};

/// Host names the dev server answers to
///
/// Ports are ignored when comparing and IP literals are always accepted.
#[derive(Debug, Clone)]
pub struct HostAllowList {
    hosts: Arc<Vec<String>>,
}

impl HostAllowList {
    /// `allowed` plus the host part of `public`
    pub fn new(allowed: &[String], public: &str) -> Self {
        let mut hosts: Vec<String> = allowed
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(public))
            .map(|host| strip_port(host).to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        hosts.sort();
        hosts.dedup();
        Self {
            hosts: Arc::new(hosts),
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn allows(&self, authority: &str) -> bool {
        let host = strip_port(authority.trim());
        if host.parse::<IpAddr>().is_ok() {
            return true;
        }
        let host = host.to_ascii_lowercase();
        self.hosts.iter().any(|allowed| *allowed == host)
    }
}

/// Host part of `host[:port]`, brackets removed from IPv6 literals
fn strip_port(authority: &str) -> &str {
    if let Some(rest) = authority.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    }
}

/// Reject requests whose `Host` is not on the allow-list
///
/// HTTP/2 requests carry the host in the URI authority rather than a header.
pub async fn host_check_middleware(
    State(hosts): State<HostAllowList>,
    request: Request,
    next: Next,
) -> Response {
    let authority = request
        .uri()
        .authority()
        .map(|a| a.as_str().to_string())
        .or_else(|| {
            request
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        });

    match authority {
        Some(ref host) if hosts.allows(host) => next.run(request).await,
        _ => {
            tracing::warn!(host = ?authority, path = %request.uri().path(), "Rejected request with invalid Host header");
            (StatusCode::FORBIDDEN, "Invalid Host header").into_response()
        }
    }
}

/// Log each request and its response time
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let span = span!(Level::INFO, "http_request", method = %method, uri = %uri);

    async move {
        let start = Instant::now();
        let response = next.run(request).await;

        info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Served"
        );
        response
    }
    .instrument(span)
    .await
}
