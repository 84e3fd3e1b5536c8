//! Request snapshot capture.
//!
//! # Responsibilities
//! - Read method, path, query, User-Agent and Referer from the request
//! - Resolve the caller address and coarse geolocation from edge context
//! - Never mutate the request
//!
//! # Design Decisions
//! - Missing headers become empty strings
//! - Non-UTF-8 header bytes are decoded lossily rather than dropped, so a
//!   binary user agent is not mistaken for an absent one

use std::net::SocketAddr;

use axum::{
    extract::ConnectInfo,
    http::{header, HeaderMap, Request},
};

use crate::config::EdgeConfig;
use crate::security::RequestSnapshot;

/// Capture the fields the classifier reads.
pub fn capture<B>(req: &Request<B>, edge: &EdgeConfig) -> RequestSnapshot {
    let headers = req.headers();
    let uri = req.uri();

    RequestSnapshot {
        method: req.method().as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        user_agent: header_string(headers, header::USER_AGENT.as_str()),
        referer: header_string(headers, header::REFERER.as_str()),
        caller_address: caller_address(req, edge),
        country: header_string(headers, &edge.country_header),
        city: header_string(headers, &edge.city_header),
    }
}

/// Peer socket address recorded by the server, if any.
pub fn peer_addr<B>(req: &Request<B>) -> Option<SocketAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

fn caller_address<B>(req: &Request<B>, edge: &EdgeConfig) -> String {
    if let Some(name) = &edge.client_ip_header {
        // X-Forwarded-For style lists: the left-most entry is the client.
        let value = header_string(req.headers(), name);
        let first = value.split(',').next().unwrap_or_default().trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }
    peer_addr(req)
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default()
}

fn header_string(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_capture_reads_fields() {
        let req = Request::builder()
            .method("POST")
            .uri("http://example.com/contact?ref=nav")
            .header("User-Agent", "Mozilla/5.0")
            .header("Referer", "https://example.com/")
            .header("x-country", "NG")
            .header("x-city", "Lagos")
            .body(Body::empty())
            .unwrap();

        let snap = capture(&req, &EdgeConfig::default());
        assert_eq!(snap.method, "POST");
        assert_eq!(snap.path, "/contact");
        assert_eq!(snap.query, "ref=nav");
        assert_eq!(snap.user_agent, "Mozilla/5.0");
        assert_eq!(snap.referer, "https://example.com/");
        assert_eq!(snap.country, "NG");
        assert_eq!(snap.city, "Lagos");
        assert_eq!(snap.caller_address, "");
    }

    #[test]
    fn test_missing_headers_are_empty() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let snap = capture(&req, &EdgeConfig::default());
        assert_eq!(snap.user_agent, "");
        assert_eq!(snap.referer, "");
        assert_eq!(snap.country, "");
    }

    #[test]
    fn test_caller_from_peer_or_edge_header() {
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "198.51.100.4, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo("10.0.0.1:5555".parse::<SocketAddr>().unwrap()));

        let snap = capture(&req, &EdgeConfig::default());
        assert_eq!(snap.caller_address, "10.0.0.1");

        let edge = EdgeConfig {
            client_ip_header: Some("x-forwarded-for".into()),
            ..EdgeConfig::default()
        };
        assert_eq!(capture(&req, &edge).caller_address, "198.51.100.4");
    }

    #[test]
    fn test_non_utf8_user_agent_is_not_empty() {
        let mut req = Request::builder().method("POST").uri("/").body(Body::empty()).unwrap();
        req.headers_mut().insert(
            header::USER_AGENT,
            HeaderValue::from_bytes(b"agent\xff").unwrap(),
        );
        let snap = capture(&req, &EdgeConfig::default());
        assert!(snap.user_agent.starts_with("agent"));
    }
}
