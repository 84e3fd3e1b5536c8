//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays bounded, status codes allowed)
//! - Compile operator-supplied rule patterns so a bad rule fails at startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// Hard upper bound on the honeypot delay.
pub const MAX_HONEYPOT_DELAY_MS: u64 = 30_000;

/// Statuses a synthesized block response may use.
pub const ALLOWED_BLOCK_STATUSES: &[u16] = &[400, 403, 404];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) => {
            if url.scheme() != "http" {
                errors.push(ValidationError::new(
                    "upstream.url",
                    format!("unsupported scheme `{}`, expected http", url.scheme()),
                ));
            }
            if url.path() != "/" || url.query().is_some() {
                errors.push(ValidationError::new(
                    "upstream.url",
                    "must not carry a path or query",
                ));
            }
        }
        Err(e) => errors.push(ValidationError::new("upstream.url", e.to_string())),
    }

    let shield = &config.shield;
    if shield.honeypot_delay_ms > MAX_HONEYPOT_DELAY_MS {
        errors.push(ValidationError::new(
            "shield.honeypot_delay_ms",
            format!("must be at most {MAX_HONEYPOT_DELAY_MS}"),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be positive"));
    } else if config.timeouts.request_secs.saturating_mul(1000) <= shield.honeypot_delay_ms {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must exceed shield.honeypot_delay_ms",
        ));
    }

    if !ALLOWED_BLOCK_STATUSES.contains(&shield.block_status) {
        errors.push(ValidationError::new(
            "shield.block_status",
            format!("{} is not one of 400, 403, 404", shield.block_status),
        ));
    }

    if shield.max_user_agent_log_len == 0 {
        errors.push(ValidationError::new(
            "shield.max_user_agent_log_len",
            "must be positive",
        ));
    }

    let extra = &shield.rules;
    let tables = [
        ("shield.rules.sensitive_paths", &extra.sensitive_paths),
        ("shield.rules.honeypot_paths", &extra.honeypot_paths),
        ("shield.rules.malicious_agents", &extra.malicious_agents),
        ("shield.rules.suspicious_patterns", &extra.suspicious_patterns),
    ];
    for (field, patterns) in tables {
        for pattern in patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ValidationError::new(
                    field,
                    format!("`{pattern}` does not compile: {e}"),
                ));
            }
        }
    }

    for glob in &config.exclusions.paths {
        if !glob.starts_with('/') {
            errors.push(ValidationError::new(
                "exclusions.paths",
                format!("`{glob}` must start with `/`"),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "`{}` is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.shield.block_status = 418;
        config.shield.honeypot_delay_ms = 60_000;
        config.timeouts.request_secs = 120;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "shield.honeypot_delay_ms",
                "shield.block_status"
            ]
        );
    }

    #[test]
    fn test_timeout_must_exceed_honeypot_delay() {
        let mut config = AppConfig::default();
        config.timeouts.request_secs = 2;
        config.shield.honeypot_delay_ms = 2000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "timeouts.request_secs");
    }

    #[test]
    fn test_upstream_must_be_plain_http_origin() {
        let mut config = AppConfig::default();
        config.upstream.url = "https://origin.internal".into();
        assert!(validate_config(&config).is_err());

        config.upstream.url = "http://origin.internal/app".into();
        assert!(validate_config(&config).is_err());

        config.upstream.url = "http://origin.internal:3000".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_malformed_extra_pattern_is_rejected() {
        let mut config = AppConfig::default();
        config.shield.rules.honeypot_paths.push("^/(unclosed".into());
        config.shield.rules.suspicious_patterns.push(r"\bdrop\s+table".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "shield.rules.honeypot_paths");
    }

    #[test]
    fn test_exclusion_globs_must_be_absolute() {
        let mut config = AppConfig::default();
        config.exclusions.paths.push("*.png".into());
        assert!(validate_config(&config).is_err());
    }
}
