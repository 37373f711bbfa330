//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract a stable record identifier from a detail-page id label.
///
/// The id element carries text like "Animal ID: 56646767"; the digit run
/// is the identifier. Labels with no digits are used verbatim (trimmed)
/// so an unusual page still yields a usable key.
pub fn extract_record_id(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits = regex::Regex::new(r"(\d+)").ok()?;

    match digits.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(m) => Some(m.as_str().to_string()),
        None => Some(trimmed.to_string()),
    }
}
