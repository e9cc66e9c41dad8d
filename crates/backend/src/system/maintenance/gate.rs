use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use contracts::system::maintenance::{AccessRequest, MaintenanceConfig};

use super::{evaluator, repository};
use crate::system::auth::jwt;

/// Client IP as the original middleware saw it: proxy headers first, socket
/// peer address as the last resort. Exact string form, no normalization,
/// matching the allowlist's exact-match semantics.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|h| h.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|h| h.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }
    peer.ip().to_string()
}

/// Whether the caller presented a valid admin token. Absent or invalid
/// credentials are not an error here: the gate authenticates
/// opportunistically and the route's own auth still applies downstream.
fn is_admin(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|token| jwt::validate_token(token).ok())
        .map(|claims| claims.is_admin)
        .unwrap_or(false)
}

/// Maintenance page shown on blocked requests. The body is operator-authored
/// HTML and is sanitized before it reaches a visitor.
fn render_page(config: &MaintenanceConfig) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n<div>{body}</div>\n</body>\n</html>\n",
        title = ammonia::clean_text(&config.page_title),
        body = ammonia::clean(&config.page_body),
    )
}

/// Gate applied to the public route tree. Loads the current configuration,
/// evaluates the request and either passes it through or answers with the
/// configured maintenance page.
pub async fn maintenance_gate(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let config = match repository::load().await {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            // Fail open: a storage hiccup must not take the site down.
            tracing::warn!("Maintenance gate could not load settings: {}", e);
            return next.run(req).await;
        }
    };

    let access_request = AccessRequest {
        client_ip: client_ip(req.headers(), peer),
        path: req.uri().path().to_string(),
        is_admin: is_admin(req.headers()),
        now: Utc::now(),
    };

    let decision = evaluator::evaluate(&config, &access_request);
    if decision.allowed {
        return next.run(req).await;
    }

    tracing::debug!(
        ip = %access_request.client_ip,
        path = %access_request.path,
        status = decision.status_code,
        "{}",
        decision.reason
    );

    Response::builder()
        .status(decision.status_code)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(render_page(&config)))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
