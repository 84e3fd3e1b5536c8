//! Built-in rule tables.
//!
//! Plain literal lists, kept directly editable. Every entry is a regular
//! expression compiled case-insensitively by [`crate::security::ruleset`].
//! Path patterns anchor to the start of the path. Prefixes that begin ordinary
//! words must not be followed by a letter, so `/executive-team` is not
//! mistaken for `/exec` while `/exec_cmd` and `/backup2024.zip` still match.

/// Configuration, credential, backup and log artifacts. Never served,
/// present or not.
pub const SENSITIVE_PATHS: &[&str] = &[
    r"^/\.env",
    r"^/\.git",
    r"^/\.htaccess",
    r"^/\.htpasswd",
    r"^/\.ssh",
    r"^/\.aws",
    r"^/\.docker",
    r"^/\.npmrc",
    r"^/\.yarnrc",
    r"^/\.pnpm",
    r"^/\.vscode",
    r"^/\.idea",
    r"^/wp-config\.php",
    r"^/config\.php",
    r"^/config\.yml",
    r"^/config\.yaml",
    r"^/database\.yml",
    r"^/secrets\.",
    r"^/credentials",
    r"^/\.secrets",
    r"^/private(?:[^a-z]|$)",
    r"^/backups?(?:[^a-z]|$)",
    r"^/\.backup",
    r"^/dump\.",
    r"^/\.dump",
    r"\.sql$",
    r"\.bak$",
    r"\.old$",
    r"\.orig$",
    r"\.save$",
    r"\.swp$",
    r"\.log$",
    r"^/debug(?:[^a-z]|$)",
    r"^/trace(?:[^a-z]|$)",
    r"^/logs/",
];

/// Paths with no legitimate visitors: admin panels, CMS and framework probe
/// endpoints, infrastructure consoles.
pub const HONEYPOT_PATHS: &[&str] = &[
    r"^/webhook$",
    r"^/api/webhook$",
    r"^/hooks$",
    r"^/callback$",
    r"^/admin$",
    r"^/administrator$",
    r"^/wp-admin",
    r"^/wp-login",
    r"^/wp-content",
    r"^/wp-includes",
    r"^/wordpress",
    r"^/phpmyadmin",
    r"^/pma",
    r"^/myadmin",
    r"^/mysql",
    r"^/xmlrpc\.php",
    r"^/wlwmanifest\.xml",
    r"^/wp-json",
    r"^/cgi-bin",
    r"^/shell(?:[^a-z]|$)",
    r"^/cmd(?:[^a-z]|$)",
    r"^/exec(?:[^a-z]|$)",
    r"^/eval(?:[^a-z]|$)",
    r"^/phpinfo",
    r"^/info\.php",
    r"^/test\.php",
    r"^/debug\.php",
    r"^/install\.php",
    r"^/setup\.php",
    r"^/config\.php",
    r"^/db\.php",
    r"^/database\.php",
    r"^/\.well-known/security\.txt$",
    // Spring Boot
    r"^/actuator",
    // Kubernetes
    r"^/api/v1/pods",
    r"^/console(?:[^a-z]|$)",
    // Tomcat
    r"^/manager(?:[^a-z]|$)",
    // JBoss
    r"^/jmx-console",
    r"^/invoker(?:[^a-z]|$)",
    r"^/web-console",
    r"^/solr(?:[^a-z]|$)",
    r"^/\.git/config",
    r"^/\.git/HEAD",
    r"^/\.svn",
    r"^/\.hg",
    r"^/\.bzr",
    // Apache
    r"^/server-status",
    r"^/server-info",
    // ASP.NET
    r"^/elmah\.axd",
    r"^/trace\.axd",
    r"^/api/swagger",
    r"^/swagger-ui",
    r"^/api-docs",
    r"^/graphql",
    r"^/graphiql",
];

/// Vulnerability scanners, fuzzers and exploitation frameworks.
pub const ATTACK_TOOL_AGENTS: &[&str] = &[
    r"nikto",
    r"sqlmap",
    r"nmap",
    r"masscan",
    r"zgrab",
    r"gobuster",
    r"dirbuster",
    r"dirb",
    r"nuclei",
    r"httpx",
    r"wpscan",
    r"joomscan",
    r"droopescan",
    r"skipfish",
    r"nessus",
    r"openvas",
    r"acunetix",
    r"burpsuite",
    r"qualys",
    r"webinspect",
    r"arachni",
    r"w3af",
    r"vega",
    // OWASP ZAP
    r"zap",
    r"havij",
    r"pangolin",
    r"xsser",
    r"commix",
    r"dalfox",
    r"xsstrike",
];

/// Default user agents of scripted HTTP clients and headless browsers.
pub const HTTP_LIBRARY_AGENTS: &[&str] = &[
    r"python-requests",
    r"python-urllib",
    r"python/\d",
    r"curl/\d",
    r"wget",
    r"libwww-perl",
    r"lwp-trivial",
    r"scrapy",
    r"mechanize",
    r"go-http-client",
    r"java/\d",
    r"okhttp",
    r"axios",
    r"node-fetch",
    r"got \(",
    r"undici",
    r"headlesschrome",
    r"phantomjs",
    r"slimerjs",
    r"htmlunit",
];

/// Aggressive SEO and commercial crawlers.
pub const SEO_CRAWLER_AGENTS: &[&str] = &[
    r"screaming frog",
    r"petalbot",
    r"megaindex",
    r"blexbot",
    r"seokicks",
    r"ahrefsbot",
    r"semrushbot",
    r"dotbot",
    r"mj12bot",
    r"aspiegelbot",
    r"bytespider",
    r"dataforseobot",
];

/// AI training crawlers.
pub const AI_CRAWLER_AGENTS: &[&str] = &[
    r"gptbot",
    r"anthropic-ai",
    r"claudebot",
];

/// Injection, traversal and obfuscation signatures looked for in the URL and
/// the Referer header.
pub const SUSPICIOUS_PATTERNS: &[&str] = &[
    // traversal
    r"\.\./",
    r"%2e%2e",
    // xss
    r"<script",
    r"%3cscript",
    r"javascript:",
    r"vbscript:",
    r"onload=",
    r"onerror=",
    r"onclick=",
    // sql injection
    r"' or '",
    r#"" or ""#,
    r"union select",
    r"concat\(",
    r"group_concat",
    r"information_schema",
    r"sleep\(\d+\)",
    r"benchmark\(",
    r"waitfor delay",
    r"; *shutdown",
    // template injection
    r"\$\{.*\}",
    r"\{\{.*\}\}",
    r"<%.*%>",
    // command and code injection
    r"exec\(",
    r"system\(",
    r"passthru\(",
    r"shell_exec",
    r"phpinfo",
    r"eval\(",
    r"base64_decode",
    r"gzinflate",
    r"str_rot13",
];

/// HTTP methods that mutate state. A request using one of these without a
/// user agent is blocked.
pub const WRITE_METHODS: &[&str] = &["POST", "PUT", "PATCH", "DELETE"];
