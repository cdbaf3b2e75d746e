//! URL handling module
//!
//! Canonicalization of raw hrefs, wildcard domain matching, and the
//! scope/validity filter applied to every discovered link.

mod normalize;
mod scope;

pub use normalize::{normalize_href, strip_fragment};
pub use scope::ScopeFilter;

use url::Url;

/// Checks if a host matches a wildcard domain pattern
///
/// Two pattern forms are supported:
/// 1. Exact: "ics.uci.edu" matches only "ics.uci.edu"
/// 2. Wildcard: "*.ics.uci.edu" matches "ics.uci.edu", "www.ics.uci.edu",
///    and nested subdomains like "archive.cs.ics.uci.edu"
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// Extracts the lowercased host from a URL, including a port if present
///
/// The port matters for cache keys: two servers on the same IP but
/// different ports have independent robots policies.
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
