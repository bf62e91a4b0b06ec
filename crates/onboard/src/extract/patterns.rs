//! Fallback name-extraction patterns.
//!
//! The pattern list is data, not control flow: an ordered slice evaluated in
//! sequence, first match wins. Order is significant and must be preserved for
//! reproducible fallback behavior.

use std::sync::OnceLock;

use regex::Regex;

/// A single pattern-to-extractor rule. The first capture group is the name.
pub struct NamePattern {
    /// Short label used in logs.
    pub label: &'static str,
    /// Pattern applied to the lowercased request.
    pub regex: Regex,
}

/// The ordered fallback pattern table.
pub fn name_patterns() -> &'static [NamePattern] {
    static PATTERNS: OnceLock<Vec<NamePattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let rules: &[(&str, &str)] = &[
            ("called", r#"called\s+["']?([a-z0-9_-]+)["']?"#),
            ("named", r#"named\s+["']?([a-z0-9_-]+)["']?"#),
            ("quoted", r#"["']([a-z0-9_-]+)["']"#),
            ("service", r"([a-z0-9_-]+)\s+service"),
            ("app", r"([a-z0-9_-]+)\s+app\b"),
            ("deploy", r"deploy\s+([a-z0-9_-]+)"),
            ("create", r"create\s+([a-z0-9_-]+)"),
        ];

        rules
            .iter()
            .map(|(label, pattern)| NamePattern {
                label,
                regex: Regex::new(pattern).expect("invalid name pattern"),
            })
            .collect()
    })
}

/// Extract an application name from a request using the pattern table.
///
/// Returns the raw captured token from the first matching rule, or `None` if
/// no rule matches.
#[must_use]
pub fn match_name(request: &str) -> Option<(&'static str, String)> {
    let lowered = request.to_lowercase();

    for pattern in name_patterns() {
        if let Some(captures) = pattern.regex.captures(&lowered) {
            if let Some(name) = captures.get(1) {
                return Some((pattern.label, name.as_str().to_string()));
            }
        }
    }

    None
}
