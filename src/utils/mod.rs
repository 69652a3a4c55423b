//! Utility functions and helpers.

pub mod http;
pub mod metric;
pub mod time;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// Only `http` and `https` results are kept; anything else is `None`.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    base.join(href)
        .ok()
        .filter(|u| is_web_scheme(u))
        .map(|u| u.to_string())
}

/// Whether an absolute link is safe to emit as an `href`.
pub fn is_web_link(link: &str) -> bool {
    Url::parse(link).is_ok_and(|u| is_web_scheme(&u))
}

fn is_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build `{base}?q={query}` with proper query encoding.
pub fn search_link(base: &str, query: &str) -> Option<String> {
    Url::parse_with_params(base, &[("q", query)])
        .ok()
        .map(|u| u.to_string())
}
