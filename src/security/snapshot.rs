//! The subset of an inbound request the classifier reads.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Immutable view of one request. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`.
    pub query: String,
    pub user_agent: String,
    pub referer: String,
    pub caller_address: String,
    pub country: String,
    pub city: String,
}

impl RequestSnapshot {
    /// Start a snapshot from a method and a path with optional query.
    pub fn new(method: impl Into<String>, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path_and_query, ""),
        };
        Self {
            method: method.into(),
            path: path.to_string(),
            query: query.to_string(),
            ..Default::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_caller(mut self, caller_address: impl Into<String>) -> Self {
        self.caller_address = caller_address.into();
        self
    }

    pub fn with_geo(mut self, country: impl Into<String>, city: impl Into<String>) -> Self {
        self.country = country.into();
        self.city = city.into();
        self
    }

    /// Path and query as they appeared on the wire.
    pub fn full_url(&self) -> Cow<'_, str> {
        if self.query.is_empty() {
            Cow::Borrowed(&self.path)
        } else {
            Cow::Owned(format!("{}?{}", self.path, self.query))
        }
    }
}

/// Percent-decode a URL once, turning `+` into a space after the `?`.
///
/// Returns `None` when decoding changes nothing, so callers can skip a
/// second scan.
pub fn decode_url(raw: &str) -> Option<String> {
    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    };

    let mut decoded = percent_decode_str(path).decode_utf8_lossy().into_owned();
    if let Some(query) = query {
        decoded.push('?');
        let query = query.replace('+', " ");
        decoded.push_str(&percent_decode_str(&query).decode_utf8_lossy());
    }

    if decoded == raw {
        None
    } else {
        Some(decoded)
    }
}
