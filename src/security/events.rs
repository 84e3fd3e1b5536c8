//! Security event records and the sinks they are written to.
//!
//! Emission is fire-and-forget: a failing sink is noted at debug level and
//! never reaches the request path.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::security::decision::{Category, Decision, Reason};
use crate::security::snapshot::RequestSnapshot;

/// Upper bound for query and referer in a record.
pub const MAX_URL_LOG_LEN: usize = 1024;

const UNKNOWN: &str = "unknown";

/// One line in the security event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Category,
    pub reason: Reason,
    pub path: String,
    pub method: String,
    pub user_agent: String,
    pub caller_address: String,
    pub country: String,
    pub city: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl SecurityEvent {
    pub fn new(
        id: String,
        decision: &Decision,
        req: &RequestSnapshot,
        max_user_agent_len: usize,
    ) -> Self {
        Self {
            id,
            kind: decision.category,
            reason: decision.reason_code,
            path: truncate(&req.path, MAX_URL_LOG_LEN).to_string(),
            method: req.method.clone(),
            user_agent: truncate(&req.user_agent, max_user_agent_len).to_string(),
            caller_address: or_unknown(&req.caller_address),
            country: or_unknown(&req.country),
            city: or_unknown(&req.city),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            query: non_empty(&req.query),
            referer: non_empty(&req.referer),
            rule: decision.matched_rule.as_ref().map(|r| r.pattern.clone()),
        }
    }
}

/// Short random identifier tying an event to a request.
pub fn new_event_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Cut `s` to at most `max` characters, on a character boundary.
pub fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn or_unknown(s: &str) -> String {
    if s.is_empty() {
        UNKNOWN.to_string()
    } else {
        s.to_string()
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| truncate(s, MAX_URL_LOG_LEN).to_string())
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Io(#[from] io::Error),

    #[error("event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for security events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SecurityEvent) -> Result<(), SinkError>;
}

/// Writes one JSON object per line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&self, event: &SecurityEvent) -> Result<(), SinkError> {
        let line = serde_json::to_string(event)?;
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps events in memory. Useful when embedding the shield or in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SecurityEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &SecurityEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink poisoned".into()))?
            .push(event.clone());
        Ok(())
    }
}

/// Builds records from decisions and hands them to a sink.
#[derive(Clone)]
pub struct EventLogger {
    sink: Arc<dyn EventSink>,
    enabled: bool,
    max_user_agent_len: usize,
}

impl EventLogger {
    pub fn new(sink: Arc<dyn EventSink>, enabled: bool, max_user_agent_len: usize) -> Self {
        Self {
            sink,
            enabled,
            max_user_agent_len,
        }
    }

    /// Record a decision. Pass decisions only reach trace-level diagnostics.
    pub fn record(&self, decision: &Decision, req: &RequestSnapshot) {
        if !decision.is_logged() {
            tracing::trace!(method = %req.method, path = %req.path, "Request passed");
            return;
        }
        if !self.enabled {
            return;
        }

        let event = SecurityEvent::new(new_event_id(), decision, req, self.max_user_agent_len);
        if let Err(e) = self.sink.emit(&event) {
            tracing::debug!(error = %e, id = %event.id, "Dropped security event");
        }
    }
}

impl std::fmt::Debug for EventLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLogger")
            .field("enabled", &self.enabled)
            .field("max_user_agent_len", &self.max_user_agent_len)
            .finish_non_exhaustive()
    }
}
