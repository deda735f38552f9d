//! Link scanning: find link-shaped substrings in raw document text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::RawLinkMatch;

/// Pattern sources for the default rules, paired with the capture group that
/// holds the link. CFML uses `#` for expression interpolation, so attribute
/// values are only links when `#` appears once, as a trailing fragment.
const DEFAULT_RULE_SOURCES: &[(&str, usize)] = &[
    // href="..", src="..", template="..", action="..", url="..", or `key: ".."`
    (r##"(?i)\b(?:href|src|template|action|url)\s*[=:]\s*"([^"#]+(?:#[^"#]*)?)""##, 1),
    (r"(?i)\b(?:href|src|template|action|url)\s*[=:]\s*'([^'#]+(?:#[^'#]*)?)'", 1),
    // cfscript `include "..";`
    (r#"(?i)\binclude\s+"([^"]+)""#, 1),
    (r"(?i)\binclude\s+'([^']+)'", 1),
];

/// Compiled default rules, built once.
static DEFAULT_RULES: LazyLock<Vec<LinkPatternRule>> = LazyLock::new(compile_default_rules);

/// A pattern plus the index of the capture group holding the link text.
#[derive(Debug, Clone)]
pub struct LinkPatternRule {
    /// Capture group index of the link substring within a full match.
    link_group: usize,
    /// The matching pattern.
    pattern: Regex,
}

impl LinkPatternRule {
    /// Build a rule from a compiled pattern and its link group index.
    pub const fn new(pattern: Regex, link_group: usize) -> Self {
        return Self {
            link_group,
            pattern,
        };
    }
}

/// Compile the built-in rule table.
///
/// # Panics
///
/// Panics if a hardcoded link regex is invalid (compile-time invariant).
#[allow(clippy::expect_used, reason = "hardcoded patterns are covered by tests")]
fn compile_default_rules() -> Vec<LinkPatternRule> {
    return DEFAULT_RULE_SOURCES
        .iter()
        .map(|&(source, group)| {
            return LinkPatternRule::new(Regex::new(source).expect("valid link regex"), group);
        })
        .collect();
}

/// The built-in CFML link rules, in evaluation order.
pub fn default_rules() -> &'static [LinkPatternRule] {
    return DEFAULT_RULES.as_slice();
}

/// Turn one capture into a raw match. The offset is found by searching for
/// the link text inside the full match, not taken from the group position.
fn raw_match_from_capture(cap: &Captures<'_>, link_group: usize) -> Option<RawLinkMatch> {
    let whole = cap.get(0)?;
    let link = cap.get(link_group)?;
    let within = whole.as_str().find(link.as_str())?;

    return Some(RawLinkMatch {
        len: link.len(),
        offset: whole.start().checked_add(within)?,
        text: link.as_str().to_string(),
    });
}

/// Scan the full text with every rule independently.
///
/// Each rule contributes all of its non-overlapping matches; results from
/// different rules are concatenated in rule order and never deduplicated.
pub fn scan_links(text: &str, rules: &[LinkPatternRule]) -> Vec<RawLinkMatch> {
    let mut matches = Vec::new();
    for rule in rules {
        matches.extend(
            rule.pattern
                .captures_iter(text)
                .filter_map(|cap| return raw_match_from_capture(&cap, rule.link_group)),
        );
    }
    return matches;
}
