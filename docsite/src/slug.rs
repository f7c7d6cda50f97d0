//! Anchor slug derivation
//!
//! Both the heading extractor and the HTML renderer derive anchor ids through
//! [`slugify`]. A table-of-contents link only scrolls if both produce the
//! same id for the same heading text.

use regex::Regex;
use std::sync::OnceLock;

/// Characters that survive slugging: lowercase ASCII letters, digits, whitespace and `-`
fn disallowed_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").expect("slug character class is valid"))
}

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Derive a URL-fragment-safe id from heading text
///
/// The text is lower-cased, every character other than `a-z`, `0-9`,
/// whitespace and `-` is removed, and each run of whitespace becomes a
/// single `-`. Edge whitespace is not trimmed here; callers that want
/// trimmed ids trim the text first.
///
/// # Examples
/// * `"Quickstart"` -> `"quickstart"`
/// * `"Rules of Engagement (RoE)"` -> `"rules-of-engagement-roe"`
/// * `"1. Create an Account"` -> `"1-create-an-account"`
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = disallowed_chars().replace_all(&lowered, "");
    whitespace_runs().replace_all(&stripped, "-").into_owned()
}
