//! Compiled rule tables.
//!
//! Patterns are compiled once at startup into case-insensitive [`RegexSet`]s
//! and are read-only afterwards, so a [`RuleBook`] is shared across requests
//! without locking.

use std::fmt;

use regex::{RegexBuilder, RegexSet, RegexSetBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::config::ShieldConfig;
use crate::security::rules;

/// Identifies which table a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTable {
    SensitivePath,
    HoneypotPath,
    AttackTool,
    HttpLibrary,
    SeoCrawler,
    AiCrawler,
    CustomAgent,
    SuspiciousContent,
    Exclusion,
}

impl RuleTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTable::SensitivePath => "sensitive_path",
            RuleTable::HoneypotPath => "honeypot_path",
            RuleTable::AttackTool => "attack_tool",
            RuleTable::HttpLibrary => "http_library",
            RuleTable::SeoCrawler => "seo_crawler",
            RuleTable::AiCrawler => "ai_crawler",
            RuleTable::CustomAgent => "custom_agent",
            RuleTable::SuspiciousContent => "suspicious_content",
            RuleTable::Exclusion => "exclusion",
        }
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pattern that failed to compile.
#[derive(Debug, Error)]
#[error("invalid {table} pattern `{pattern}`: {source}")]
pub struct RuleError {
    pub table: RuleTable,
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// One category of patterns. Any match in the set triggers the category.
#[derive(Debug, Clone)]
pub struct RuleSet {
    table: RuleTable,
    patterns: Vec<String>,
    set: RegexSet,
}

impl RuleSet {
    /// Compile `patterns` case-insensitively.
    ///
    /// Each pattern is compiled on its own first so the error names the
    /// offending entry.
    pub fn compile<I, S>(table: RuleTable, patterns: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        for pattern in &patterns {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RuleError {
                    table,
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError {
                table,
                pattern: patterns.join(" | "),
                source,
            })?;

        Ok(Self {
            table,
            patterns,
            set,
        })
    }

    /// A set that never matches.
    pub fn empty(table: RuleTable) -> Self {
        Self {
            table,
            patterns: Vec::new(),
            set: RegexSet::empty(),
        }
    }

    pub fn table(&self) -> RuleTable {
        self.table
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The first pattern (in table order) matching `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.set
            .matches(text)
            .iter()
            .next()
            .map(|idx| self.patterns[idx].as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.set.is_match(text)
    }
}

/// All rule tables, compiled and frozen.
#[derive(Debug, Clone)]
pub struct RuleBook {
    pub sensitive_paths: RuleSet,
    pub honeypot_paths: RuleSet,
    /// Enabled user-agent sub-lists, checked in order.
    pub agents: Vec<RuleSet>,
    pub suspicious: RuleSet,
}

impl RuleBook {
    /// The built-in tables with every sub-list enabled.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::from_config(&ShieldConfig::default())
    }

    /// Built-in tables plus configured additions, honoring sub-list toggles.
    pub fn from_config(config: &ShieldConfig) -> Result<Self, RuleError> {
        let extra = &config.rules;

        let sensitive_paths = RuleSet::compile(
            RuleTable::SensitivePath,
            chain(rules::SENSITIVE_PATHS, &extra.sensitive_paths),
        )?;
        let honeypot_paths = RuleSet::compile(
            RuleTable::HoneypotPath,
            chain(rules::HONEYPOT_PATHS, &extra.honeypot_paths),
        )?;

        let toggles = &config.agents;
        let sublists = [
            (toggles.block_attack_tools, RuleTable::AttackTool, rules::ATTACK_TOOL_AGENTS),
            (toggles.block_http_libraries, RuleTable::HttpLibrary, rules::HTTP_LIBRARY_AGENTS),
            (toggles.block_seo_crawlers, RuleTable::SeoCrawler, rules::SEO_CRAWLER_AGENTS),
            (toggles.block_ai_crawlers, RuleTable::AiCrawler, rules::AI_CRAWLER_AGENTS),
        ];
        let mut agents = Vec::with_capacity(sublists.len() + 1);
        for (enabled, table, patterns) in sublists {
            if enabled {
                agents.push(RuleSet::compile(table, patterns.iter().copied())?);
            }
        }
        if !extra.malicious_agents.is_empty() {
            agents.push(RuleSet::compile(
                RuleTable::CustomAgent,
                extra.malicious_agents.iter().cloned(),
            )?);
        }

        let suspicious = RuleSet::compile(
            RuleTable::SuspiciousContent,
            chain(rules::SUSPICIOUS_PATTERNS, &extra.suspicious_patterns),
        )?;

        tracing::debug!(
            sensitive = sensitive_paths.len(),
            honeypot = honeypot_paths.len(),
            agent_lists = agents.len(),
            suspicious = suspicious.len(),
            "Rule tables compiled"
        );

        Ok(Self {
            sensitive_paths,
            honeypot_paths,
            agents,
            suspicious,
        })
    }

    /// First enabled user-agent sub-list matching `user_agent`.
    pub fn match_agent(&self, user_agent: &str) -> Option<(RuleTable, &str)> {
        self.agents
            .iter()
            .find_map(|set| set.first_match(user_agent).map(|p| (set.table(), p)))
    }
}

fn chain<'a>(
    builtin: &'a [&'a str],
    extra: &'a [String],
) -> impl Iterator<Item = String> + 'a {
    builtin
        .iter()
        .map(|p| p.to_string())
        .chain(extra.iter().cloned())
}
