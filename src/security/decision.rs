//! Classification outcome for a single request.

use std::fmt;

use serde::Serialize;

use crate::security::ruleset::RuleTable;

/// Decision category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Block,
    Honeypot,
    Attack,
    Suspicious,
    Pass,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Block => "BLOCK",
            Category::Honeypot => "HONEYPOT",
            Category::Attack => "ATTACK",
            Category::Suspicious => "SUSPICIOUS",
            Category::Pass => "PASS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason code attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    SensitiveFileAccess,
    HoneypotTriggered,
    EmptyUserAgentOnWrite,
    MaliciousUserAgent,
    SuspiciousPatternInUrl,
    SuspiciousPatternInReferer,
    PostRequestLogged,
    NoMatch,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::SensitiveFileAccess => "SENSITIVE_FILE_ACCESS",
            Reason::HoneypotTriggered => "HONEYPOT_TRIGGERED",
            Reason::EmptyUserAgentOnWrite => "EMPTY_USER_AGENT_ON_WRITE",
            Reason::MaliciousUserAgent => "MALICIOUS_USER_AGENT",
            Reason::SuspiciousPatternInUrl => "SUSPICIOUS_PATTERN_IN_URL",
            Reason::SuspiciousPatternInReferer => "SUSPICIOUS_PATTERN_IN_REFERER",
            Reason::PostRequestLogged => "POST_REQUEST_LOGGED",
            Reason::NoMatch => "NO_MATCH",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pattern that produced a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRule {
    pub table: RuleTable,
    pub pattern: String,
}

/// Exactly one per request; computed once, never revised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub category: Category,
    pub reason_code: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<MatchedRule>,
}

impl Decision {
    pub fn pass() -> Self {
        Self {
            category: Category::Pass,
            reason_code: Reason::NoMatch,
            matched_rule: None,
        }
    }

    pub fn new(category: Category, reason_code: Reason) -> Self {
        Self {
            category,
            reason_code,
            matched_rule: None,
        }
    }

    pub fn matched(category: Category, reason_code: Reason, table: RuleTable, pattern: &str) -> Self {
        Self {
            category,
            reason_code,
            matched_rule: Some(MatchedRule {
                table,
                pattern: pattern.to_string(),
            }),
        }
    }

    /// Whether the request continues to the next handler.
    pub fn allows(&self) -> bool {
        matches!(self.category, Category::Pass | Category::Suspicious)
    }

    /// Whether a security event is emitted for this decision.
    pub fn is_logged(&self) -> bool {
        self.category != Category::Pass
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.category, self.reason_code)?;
        if let Some(rule) = &self.matched_rule {
            write!(f, " [{}: {}]", rule.table, rule.pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_wire_names() {
        let decision = Decision::matched(
            Category::Block,
            Reason::SensitiveFileAccess,
            RuleTable::SensitivePath,
            r"^/\.env",
        );
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["category"], "BLOCK");
        assert_eq!(json["reasonCode"], "SENSITIVE_FILE_ACCESS");
        assert_eq!(json["matchedRule"]["table"], "sensitive_path");
        assert_eq!(json["matchedRule"]["pattern"], r"^/\.env");

        let pass = serde_json::to_value(Decision::pass()).unwrap();
        assert!(pass.get("matchedRule").is_none());
    }

    #[test]
    fn test_suspicious_still_allows() {
        let logged = Decision::new(Category::Suspicious, Reason::PostRequestLogged);
        assert!(logged.allows());
        assert!(logged.is_logged());

        assert!(Decision::pass().allows());
        assert!(!Decision::pass().is_logged());
        assert!(!Decision::new(Category::Attack, Reason::SuspiciousPatternInUrl).allows());
    }

    #[test]
    fn test_display() {
        let decision = Decision::new(Category::Honeypot, Reason::HoneypotTriggered);
        assert_eq!(decision.to_string(), "HONEYPOT(HONEYPOT_TRIGGERED)");
    }
}
