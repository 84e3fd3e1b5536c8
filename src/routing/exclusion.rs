//! Static-asset exclusion list.
//!
//! # Design Decisions
//! - Globs, not regex, in configuration: `*` matches any run of characters,
//!   including `/`; everything else is literal
//! - Matching is case-sensitive and anchored at both ends
//! - Compiled once at startup into a single set
//! - A path with dot segments or encoded dots and separators is never
//!   excluded: `/assets/../.env` is not an asset, whatever the glob says

use regex::RegexSet;

use crate::security::{RuleError, RuleTable};

/// Paths that bypass the shield.
#[derive(Debug, Clone)]
pub struct ExclusionList {
    globs: Vec<String>,
    set: RegexSet,
}

impl ExclusionList {
    /// Globs are escaped before compilation, so only size limits can fail.
    pub fn new<I, S>(globs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let globs: Vec<String> = globs.into_iter().map(Into::into).collect();
        let set = RegexSet::new(globs.iter().map(|g| glob_to_regex(g))).map_err(|source| {
            RuleError {
                table: RuleTable::Exclusion,
                pattern: globs.join(" | "),
                source,
            }
        })?;
        Ok(Self { globs, set })
    }

    pub fn empty() -> Self {
        Self {
            globs: Vec::new(),
            set: RegexSet::empty(),
        }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        !escapes_prefix(path) && self.set.is_match(path)
    }

    pub fn globs(&self) -> &[String] {
        &self.globs
    }
}

/// Whether `path` could resolve outside the prefix it appears to start with.
fn escapes_prefix(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    if ["%2e", "%2f", "%5c"].iter().any(|enc| lower.contains(enc)) {
        return true;
    }
    path.split(['/', '\\'])
        .any(|segment| segment == "." || segment == "..")
}

fn glob_to_regex(glob: &str) -> String {
    let body = glob
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{body}$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusionConfig;

    fn defaults() -> ExclusionList {
        ExclusionList::new(ExclusionConfig::default().paths).unwrap()
    }

    #[test]
    fn test_default_static_assets_are_excluded() {
        let list = defaults();
        for path in [
            "/favicon.ico",
            "/robots.txt",
            "/sitemap.xml",
            "/sitemap-blog.xml",
            "/_next/static/chunks/main.js",
            "/assets/index-4f2a.css",
            "/images/hero.webp",
            "/fonts/inter.woff2",
            "/logo.png",
            "/team/photos/ceo.jpg",
        ] {
            assert!(list.is_excluded(path), "{path}");
        }
    }

    #[test]
    fn test_pages_are_not_excluded() {
        let list = defaults();
        for path in ["/", "/pricing", "/.env", "/wp-admin", "/robots.txt.bak", "/static"] {
            assert!(!list.is_excluded(path), "{path}");
        }
    }

    #[test]
    fn test_glob_is_literal_apart_from_star() {
        let list = ExclusionList::new(["/a.b/*"]).unwrap();
        assert!(list.is_excluded("/a.b/c"));
        assert!(!list.is_excluded("/axb/c"));
    }

    #[test]
    fn test_dot_segments_are_never_excluded() {
        let list = defaults();
        for path in [
            "/assets/../.env",
            "/images/../../etc/passwd",
            "/static/./../wp-admin",
            "/static/..%2f..%2fwp-admin",
            "/assets/%2E%2E/config.php",
            "/fonts/..\\..\\secrets.json",
            "/_next/static/../../x.png",
        ] {
            assert!(!list.is_excluded(path), "{path}");
        }
    }

    #[test]
    fn test_dots_inside_names_are_still_assets() {
        let list = defaults();
        assert!(list.is_excluded("/assets/app.v2..min.js"));
        assert!(list.is_excluded("/images/.hidden.png"));
    }

    #[test]
    fn test_empty_list_excludes_nothing() {
        assert!(!ExclusionList::empty().is_excluded("/favicon.ico"));
    }
}
