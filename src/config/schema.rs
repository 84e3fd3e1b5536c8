//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shield.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the security shield.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Origin that receives pass-through requests.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request classification and response behavior.
    pub shield: ShieldConfig,

    /// Where the hosting platform puts its edge context.
    pub edge: EdgeConfig,

    /// Requests that bypass the shield entirely.
    pub exclusions: ExclusionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin base URL (e.g., "http://127.0.0.1:3000").
    pub url: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Shield behavior: feature toggles, response shaping and rule additions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShieldConfig {
    /// Trap requests to honeypot paths.
    pub enable_honeypot: bool,

    /// Block empty user agents on writes and known malicious user agents.
    pub enable_user_agent_blocking: bool,

    /// Block requests for sensitive files.
    pub enable_path_blocking: bool,

    /// Scan the URL and Referer for injection payloads.
    pub enable_content_inspection: bool,

    /// Emit security events to the event sink.
    pub enable_logging: bool,

    /// Emit an event for every POST that passes the other checks.
    pub log_post_requests: bool,

    /// Artificial delay before answering a honeypot hit, in milliseconds.
    pub honeypot_delay_ms: u64,

    /// Status for sensitive-file blocks (400, 403 or 404).
    pub block_status: u16,

    /// User agents longer than this are truncated in security events.
    pub max_user_agent_log_len: usize,

    /// User-agent sub-list toggles.
    pub agents: AgentListConfig,

    /// Extra patterns appended to the built-in rule tables.
    pub rules: ExtraRulesConfig,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            enable_honeypot: true,
            enable_user_agent_blocking: true,
            enable_path_blocking: true,
            enable_content_inspection: true,
            enable_logging: true,
            log_post_requests: true,
            honeypot_delay_ms: 2000,
            // 404 looks like "nothing here", 403 says "protected"
            block_status: 404,
            max_user_agent_log_len: 200,
            agents: AgentListConfig::default(),
            rules: ExtraRulesConfig::default(),
        }
    }
}

/// Independent toggles for the user-agent sub-lists.
///
/// The lists carry different false-positive risk: attack tooling is
/// unambiguous, while HTTP client libraries and crawlers are a policy choice.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentListConfig {
    pub block_attack_tools: bool,
    pub block_http_libraries: bool,
    pub block_seo_crawlers: bool,
    pub block_ai_crawlers: bool,
}

impl Default for AgentListConfig {
    fn default() -> Self {
        Self {
            block_attack_tools: true,
            block_http_libraries: true,
            block_seo_crawlers: true,
            block_ai_crawlers: true,
        }
    }
}

/// Operator-supplied regular expressions, matched case-insensitively.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExtraRulesConfig {
    pub sensitive_paths: Vec<String>,
    pub honeypot_paths: Vec<String>,
    pub malicious_agents: Vec<String>,
    pub suspicious_patterns: Vec<String>,
}

/// Header names carrying the hosting platform's edge context.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Header holding the caller address. When unset, the socket peer is used.
    pub client_ip_header: Option<String>,

    /// Header holding the caller's country code.
    pub country_header: String,

    /// Header holding the caller's city.
    pub city_header: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            client_ip_header: None,
            country_header: "x-country".to_string(),
            city_header: "x-city".to_string(),
        }
    }
}

/// Static-asset exclusion list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Path globs; `*` matches any run of characters, including `/`.
    pub paths: Vec<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        let paths = [
            "/favicon.ico",
            "/robots.txt",
            "/sitemap.xml",
            "/sitemap-*.xml",
            "/_next/static/*",
            "/static/*",
            "/assets/*",
            "/images/*",
            "/img/*",
            "/css/*",
            "/js/*",
            "/fonts/*",
            "/*.png",
            "/*.jpg",
            "/*.jpeg",
            "/*.gif",
            "/*.webp",
            "/*.svg",
            "/*.ico",
            "/*.woff",
            "/*.woff2",
            "/*.ttf",
            "/*.eot",
        ];
        Self {
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Log output format for operational diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Diagnostic log format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
