//! Forwarding of pass-through requests to the origin.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the configured origin
//! - Record the caller in X-Forwarded-For
//! - Stream the request and response bodies without buffering
//! - Map connection failures to 502 Bad Gateway

use std::str::FromStr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, InvalidUri, PathAndQuery, Scheme},
        HeaderName, HeaderValue, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::http::request::peer_addr;
use crate::observability::metrics;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// The configured origin cannot be used.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("upstream url `{0}` has no host")]
    MissingHost(String),

    #[error("invalid upstream authority: {0}")]
    Authority(#[from] InvalidUri),
}

/// The next handler in the chain: a pooled client bound to one origin.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl Upstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let url = Url::parse(&config.url)?;
        let host = url
            .host_str()
            .ok_or_else(|| UpstreamError::MissingHost(config.url.clone()))?;
        let authority = match url.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority = Authority::from_str(&authority)?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client, authority })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Send `req` to the origin and relay its response.
    pub async fn forward(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let caller = peer_addr(&req);
        let (mut parts, body) = req.into_parts();

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = match Uri::from_parts(uri_parts) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(error = %e, "Could not rewrite request URI");
                return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
            }
        };

        if let Some(addr) = caller {
            let forwarded = match parts.headers.get(X_FORWARDED_FOR) {
                Some(prior) => format!("{}, {}", String::from_utf8_lossy(prior.as_bytes()), addr.ip()),
                None => addr.ip().to_string(),
            };
            if let Ok(value) = HeaderValue::from_str(&forwarded) {
                parts
                    .headers
                    .insert(HeaderName::from_static(X_FORWARDED_FOR), value);
            }
        }

        let path = parts.uri.path().to_string();
        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                metrics::record_upstream(response.status().as_u16(), start);
                response.map(Body::new)
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path, upstream = %self.authority, "Upstream error");
                metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16(), start);
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

/// Axum handler forwarding everything to the origin.
pub async fn forward_handler(State(upstream): State<Upstream>, req: Request<Body>) -> Response {
    upstream.forward(req).await
}
