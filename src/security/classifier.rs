//! Ordered request classification.
//!
//! ```text
//! 1. sensitive path          → BLOCK      SENSITIVE_FILE_ACCESS
//! 2. honeypot path           → HONEYPOT   HONEYPOT_TRIGGERED
//! 3. empty agent on write    → BLOCK      EMPTY_USER_AGENT_ON_WRITE
//! 4. malicious agent         → BLOCK      MALICIOUS_USER_AGENT
//! 5. suspicious URL          → ATTACK     SUSPICIOUS_PATTERN_IN_URL
//! 6. suspicious Referer      → ATTACK     SUSPICIOUS_PATTERN_IN_REFERER
//! 7. POST                    → SUSPICIOUS POST_REQUEST_LOGGED (passes)
//! 8. otherwise               → PASS
//! ```
//!
//! The first matching stage wins. Path stages run first: they are cheap
//! prefix checks and the most specific classification.

use crate::config::ShieldConfig;
use crate::security::decision::{Category, Decision, Reason};
use crate::security::rules::WRITE_METHODS;
use crate::security::ruleset::{RuleBook, RuleError, RuleSet, RuleTable};
use crate::security::snapshot::{decode_url, RequestSnapshot};

/// Which stages are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub path_blocking: bool,
    pub honeypot: bool,
    pub user_agent_blocking: bool,
    pub content_inspection: bool,
    pub log_post_requests: bool,
}

impl Stages {
    pub fn all() -> Self {
        Self {
            path_blocking: true,
            honeypot: true,
            user_agent_blocking: true,
            content_inspection: true,
            log_post_requests: true,
        }
    }
}

impl From<&ShieldConfig> for Stages {
    fn from(config: &ShieldConfig) -> Self {
        Self {
            path_blocking: config.enable_path_blocking,
            honeypot: config.enable_honeypot,
            user_agent_blocking: config.enable_user_agent_blocking,
            content_inspection: config.enable_content_inspection,
            log_post_requests: config.log_post_requests,
        }
    }
}

/// Pure mapping from a [`RequestSnapshot`] to a [`Decision`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleBook,
    stages: Stages,
}

impl Classifier {
    pub fn new(rules: RuleBook, stages: Stages) -> Self {
        Self { rules, stages }
    }

    pub fn from_config(config: &ShieldConfig) -> Result<Self, RuleError> {
        Ok(Self::new(RuleBook::from_config(config)?, Stages::from(config)))
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn classify(&self, req: &RequestSnapshot) -> Decision {
        if self.stages.path_blocking {
            if let Some(pattern) = self.rules.sensitive_paths.first_match(&req.path) {
                return Decision::matched(
                    Category::Block,
                    Reason::SensitiveFileAccess,
                    RuleTable::SensitivePath,
                    pattern,
                );
            }
        }

        if self.stages.honeypot {
            if let Some(pattern) = self.rules.honeypot_paths.first_match(&req.path) {
                return Decision::matched(
                    Category::Honeypot,
                    Reason::HoneypotTriggered,
                    RuleTable::HoneypotPath,
                    pattern,
                );
            }
        }

        if self.stages.user_agent_blocking {
            // Bots often skip the header; a write without one is itself a signal.
            if req.user_agent.trim().is_empty() && is_write(&req.method) {
                return Decision::new(Category::Block, Reason::EmptyUserAgentOnWrite);
            }

            if let Some((table, pattern)) = self.rules.match_agent(&req.user_agent) {
                return Decision::matched(
                    Category::Block,
                    Reason::MaliciousUserAgent,
                    table,
                    pattern,
                );
            }
        }

        if self.stages.content_inspection {
            if let Some(pattern) = scan(&self.rules.suspicious, &req.full_url()) {
                return Decision::matched(
                    Category::Attack,
                    Reason::SuspiciousPatternInUrl,
                    RuleTable::SuspiciousContent,
                    pattern,
                );
            }

            if !req.referer.is_empty() {
                if let Some(pattern) = scan(&self.rules.suspicious, &req.referer) {
                    return Decision::matched(
                        Category::Attack,
                        Reason::SuspiciousPatternInReferer,
                        RuleTable::SuspiciousContent,
                        pattern,
                    );
                }
            }
        }

        if self.stages.log_post_requests && req.method.eq_ignore_ascii_case("POST") {
            return Decision::new(Category::Suspicious, Reason::PostRequestLogged);
        }

        Decision::pass()
    }
}

fn is_write(method: &str) -> bool {
    WRITE_METHODS.iter().any(|m| m.eq_ignore_ascii_case(method))
}

/// Match the raw text, then its decoded form.
fn scan<'a>(set: &'a RuleSet, raw: &str) -> Option<&'a str> {
    set.first_match(raw)
        .or_else(|| decode_url(raw).and_then(|decoded| set.first_match(&decoded)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSER: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

    fn classifier() -> Classifier {
        Classifier::new(RuleBook::builtin().unwrap(), Stages::all())
    }

    fn get(path: &str) -> RequestSnapshot {
        RequestSnapshot::new("GET", path).with_user_agent(BROWSER)
    }

    fn reason(req: &RequestSnapshot) -> Reason {
        classifier().classify(req).reason_code
    }

    #[test]
    fn test_sensitive_files() {
        for path in [
            "/.env",
            "/.env.local",
            "/.git/config",
            "/.aws/credentials",
            "/wp-config.php",
            "/backup",
            "/backup.tar.gz",
            "/backups/2024",
            "/dump.sql",
            "/var/app.log",
            "/old/index.php.bak",
            "/logs/error",
            "/backup2024.tar.gz",
            "/backup_db.zip",
            "/private_key.pem",
            "/private/keys",
            "/credentials_prod.json",
            "/debug_toolbar",
            "/DEBUG",
        ] {
            let decision = classifier().classify(&get(path));
            assert_eq!(decision.category, Category::Block, "{path}");
            assert_eq!(decision.reason_code, Reason::SensitiveFileAccess, "{path}");
        }
    }

    #[test]
    fn test_honeypots() {
        for path in [
            "/wp-admin",
            "/wp-admin/install.php",
            "/wp-login.php",
            "/admin",
            "/phpmyadmin/index.php",
            "/xmlrpc.php",
            "/actuator/health",
            "/cgi-bin/test.cgi",
            "/shell.php",
            "/manager/html",
            "/.svn/entries",
            "/graphql",
            "/.well-known/security.txt",
            "/mysqladmin",
            "/pma2020/index.php",
            "/exec_cmd",
            "/console2",
            "/solr/admin",
        ] {
            let decision = classifier().classify(&get(path));
            assert_eq!(decision.category, Category::Honeypot, "{path}");
            assert_eq!(decision.reason_code, Reason::HoneypotTriggered, "{path}");
        }
    }

    #[test]
    fn test_ordinary_paths_are_not_trapped() {
        for path in [
            "/",
            "/blog/my-backup-strategy",
            "/executive-team",
            "/evaluation",
            "/consoles",
            "/privacy",
            "/admin-guide/intro",
            "/pricing",
            "/docs/tracing",
            "/blog/.env-files-explained",
        ] {
            assert_eq!(reason(&get(path)), Reason::NoMatch, "{path}");
        }
    }

    #[test]
    fn test_sensitive_wins_over_honeypot() {
        // listed in both tables
        let decision = classifier().classify(&get("/config.php"));
        assert_eq!(decision.reason_code, Reason::SensitiveFileAccess);

        let decision = classifier().classify(&get("/.git/HEAD"));
        assert_eq!(decision.reason_code, Reason::SensitiveFileAccess);
    }

    #[test]
    fn test_honeypot_wins_over_malicious_agent() {
        let req = RequestSnapshot::new("GET", "/wp-admin").with_user_agent("sqlmap/1.7");
        let decision = classifier().classify(&req);
        assert_eq!(decision.category, Category::Honeypot);
        assert_eq!(decision.reason_code, Reason::HoneypotTriggered);
    }

    #[test]
    fn test_empty_agent_on_write() {
        for method in ["POST", "PUT", "PATCH", "DELETE", "post"] {
            let req = RequestSnapshot::new(method, "/contact");
            assert_eq!(reason(&req), Reason::EmptyUserAgentOnWrite, "{method}");
        }

        let blank = RequestSnapshot::new("POST", "/contact").with_user_agent("   ");
        assert_eq!(reason(&blank), Reason::EmptyUserAgentOnWrite);

        for method in ["GET", "HEAD", "OPTIONS"] {
            let req = RequestSnapshot::new(method, "/contact");
            assert_eq!(reason(&req), Reason::NoMatch, "{method}");
        }
    }

    #[test]
    fn test_malicious_agents() {
        for ua in [
            "curl/8.0",
            "python-requests/2.31",
            "Wget/1.21",
            "Mozilla/5.0 (compatible; Nuclei)",
            "sqlmap/1.7#stable",
            "Go-http-client/1.1",
            "Mozilla/5.0 (compatible; SemrushBot/7)",
            "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko; compatible; GPTBot/1.0)",
            "Mozilla/5.0 (X11; Linux x86_64) HeadlessChrome/120.0",
        ] {
            let req = get("/pricing").with_user_agent(ua);
            let decision = classifier().classify(&req);
            assert_eq!(decision.category, Category::Block, "{ua}");
            assert_eq!(decision.reason_code, Reason::MaliciousUserAgent, "{ua}");
        }
    }

    #[test]
    fn test_malicious_agent_records_sublist() {
        let req = get("/").with_user_agent("curl/8.4.0");
        let rule = classifier().classify(&req).matched_rule.unwrap();
        assert_eq!(rule.table, RuleTable::HttpLibrary);
        assert_eq!(rule.pattern, r"curl/\d");
    }

    #[test]
    fn test_post_with_malicious_agent_blocks_before_post_logging() {
        let req = RequestSnapshot::new("POST", "/contact").with_user_agent("curl/8.0");
        assert_eq!(reason(&req), Reason::MaliciousUserAgent);
    }

    #[test]
    fn test_suspicious_url() {
        for url in [
            "/../../etc/passwd",
            "/files/%2e%2e/secret",
            "/search?q=<script>alert(1)</script>",
            "/search?q=%3Cscript%3Ealert(1)%3C/script%3E",
            "/search?q=' OR '1'='1",
            "/search?q=%27%20OR%20%271%27%3D%271",
            "/search?q=union+select+*+from+users",
            "/p?id=1;SLEEP(5)",
            "/greet?name={{7*7}}",
            "/greet?name=${jndi:ldap://x}",
            "/download?file=%252e%252e%252fetc%252fpasswd",
        ] {
            let decision = classifier().classify(&get(url));
            assert_eq!(decision.category, Category::Attack, "{url}");
            assert_eq!(decision.reason_code, Reason::SuspiciousPatternInUrl, "{url}");
        }
    }

    #[test]
    fn test_suspicious_referer() {
        let req = get("/").with_referer("https://evil.example/?q=<script>alert(1)</script>");
        let decision = classifier().classify(&req);
        assert_eq!(decision.category, Category::Attack);
        assert_eq!(decision.reason_code, Reason::SuspiciousPatternInReferer);

        let clean = get("/").with_referer("https://www.google.com/search?q=lanonasis+pricing");
        assert_eq!(reason(&clean), Reason::NoMatch);
    }

    #[test]
    fn test_url_attack_wins_over_referer_attack() {
        let req = get("/?q=union select").with_referer("https://x/<script>");
        assert_eq!(reason(&req), Reason::SuspiciousPatternInUrl);
    }

    #[test]
    fn test_post_is_logged_but_passes() {
        let req = RequestSnapshot::new("POST", "/contact").with_user_agent(BROWSER);
        let decision = classifier().classify(&req);
        assert_eq!(decision.category, Category::Suspicious);
        assert_eq!(decision.reason_code, Reason::PostRequestLogged);
        assert!(decision.allows());
    }

    #[test]
    fn test_clean_get_passes() {
        let decision = classifier().classify(&get("/"));
        assert_eq!(decision, Decision::pass());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = classifier();
        let req = get("/search?q=<script>").with_referer("https://example.com/");
        assert_eq!(classifier.classify(&req), classifier.classify(&req));
    }

    #[test]
    fn test_disabled_stages_are_skipped() {
        let stages = Stages {
            path_blocking: false,
            honeypot: false,
            user_agent_blocking: false,
            content_inspection: false,
            log_post_requests: false,
        };
        let classifier = Classifier::new(RuleBook::builtin().unwrap(), stages);

        for req in [
            get("/.env"),
            get("/wp-admin"),
            RequestSnapshot::new("POST", "/contact"),
            get("/").with_user_agent("sqlmap/1.7"),
            get("/?q=<script>"),
        ] {
            assert_eq!(classifier.classify(&req), Decision::pass());
        }
    }

    #[test]
    fn test_disabled_path_blocking_falls_through_to_honeypot() {
        let stages = Stages {
            path_blocking: false,
            ..Stages::all()
        };
        let classifier = Classifier::new(RuleBook::builtin().unwrap(), stages);
        let decision = classifier.classify(&get("/config.php"));
        assert_eq!(decision.reason_code, Reason::HoneypotTriggered);
    }
}
