//! # Selector Paths
//!
//! A selector points at a value inside an object's JSON representation,
//! e.g. `external_references.[0].source_name`. The root segment is a 3–250
//! character token; each following `.`-separated segment is either a
//! bracketed list index or a 1–250 character token. Tokens draw from
//! `[a-z0-9_-]`.

use std::sync::OnceLock;

use regex::Regex;

const SELECTOR_PATTERN: &str = r"^[a-z0-9_-]{3,250}(\.(\[\d+\]|[a-z0-9_-]{1,250}))*$";

fn selector_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SELECTOR_PATTERN).expect("selector pattern is a valid regex"))
}

/// True when `value` follows the selector grammar.
pub fn is_selector(value: &str) -> bool {
    selector_regex().is_match(value)
}
