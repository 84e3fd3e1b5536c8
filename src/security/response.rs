//! Turns a [`Decision`] into a response or a pass-through.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::config::validation::{ALLOWED_BLOCK_STATUSES, MAX_HONEYPOT_DELAY_MS};
use crate::config::ShieldConfig;
use crate::security::decision::{Category, Decision, Reason};

pub const X_ROBOTS_TAG: &str = "x-robots-tag";
pub const NO_INDEX: &str = "noindex, nofollow";
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate";

/// What to do with a classified request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hand the request to the next handler unchanged.
    Forward,
    /// Answer here.
    Reject(Rejection),
}

/// A synthesized response, optionally delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rejection {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    #[serde(rename = "delay_ms", serialize_with = "serialize_delay")]
    pub delay: Option<Duration>,
}

impl Rejection {
    pub fn new(status: StatusCode) -> Self {
        Self { status, delay: None }
    }

    pub fn delayed(status: StatusCode, delay: Duration) -> Self {
        Self {
            status,
            delay: (!delay.is_zero()).then_some(delay),
        }
    }

    /// Plain-text body. A blocked 404 reads exactly like a genuine one.
    pub fn body(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Blocked")
    }

    /// Wait out the delay without holding a worker, then build the response.
    ///
    /// If the client goes away the future is dropped and nothing is sent.
    pub async fn respond(self) -> Response {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.into_response()
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body()));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        headers.insert(X_ROBOTS_TAG, HeaderValue::from_static(NO_INDEX));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        response
    }
}

/// Maps decisions to actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePolicy {
    /// Status for sensitive-file blocks.
    pub block_status: StatusCode,
    pub honeypot_delay: Duration,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self {
            block_status: StatusCode::NOT_FOUND,
            honeypot_delay: Duration::from_millis(2000),
        }
    }
}

/// Bounds hold even for configurations that never went through validation:
/// the delay is capped and an unsupported block status falls back to 404.
impl From<&ShieldConfig> for ResponsePolicy {
    fn from(config: &ShieldConfig) -> Self {
        let block_status = if ALLOWED_BLOCK_STATUSES.contains(&config.block_status) {
            StatusCode::from_u16(config.block_status).unwrap_or(StatusCode::NOT_FOUND)
        } else {
            StatusCode::NOT_FOUND
        };
        Self {
            block_status,
            honeypot_delay: Duration::from_millis(config.honeypot_delay_ms.min(MAX_HONEYPOT_DELAY_MS)),
        }
    }
}

impl ResponsePolicy {
    pub fn action_for(&self, decision: &Decision) -> Action {
        match (decision.category, decision.reason_code) {
            (Category::Pass | Category::Suspicious, _) => Action::Forward,
            (Category::Honeypot, _) => {
                Action::Reject(Rejection::delayed(StatusCode::NOT_FOUND, self.honeypot_delay))
            }
            (Category::Block, Reason::SensitiveFileAccess) => {
                Action::Reject(Rejection::new(self.block_status))
            }
            (Category::Block, _) => Action::Reject(Rejection::new(StatusCode::FORBIDDEN)),
            (Category::Attack, _) => Action::Reject(Rejection::new(StatusCode::BAD_REQUEST)),
        }
    }
}

fn serialize_status<S: serde::Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

fn serialize_delay<S: serde::Serializer>(delay: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(delay.map(|d| d.as_millis() as u64).unwrap_or(0))
}
