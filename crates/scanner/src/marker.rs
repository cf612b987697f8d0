//! Commit message markers.

use regex::Regex;
use std::sync::OnceLock;

fn readings_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[meter-readings:([^\]]*)\]").expect("valid readings marker regex"))
}

fn expect_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[meter-expect:([^\]]*)\]").expect("valid expect marker regex"))
}

/// Branch named by the first `[meter-readings:<branch>]` marker, trimmed.
pub fn readings_branch(message: &str) -> Option<String> {
    readings_re()
        .captures_iter(message)
        .map(|c| c[1].trim().to_string())
        .find(|branch| !branch.is_empty())
}

/// Texts of every `[meter-expect:<text>]` marker, trimmed, in message order.
pub fn expectations(message: &str) -> Vec<String> {
    expect_re()
        .captures_iter(message)
        .map(|c| c[1].trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
