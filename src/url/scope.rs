use crate::config::ScopeConfig;
use crate::url::matches_wildcard;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// A path segment that enumerates pages: "page3", "page042", ...
static PAGINATION_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^page\d+$").expect("hardcoded regex pattern is valid"));

/// Common date encodings found in archive/calendar paths:
/// YYYY-MM-DD, YYYY/MM/DD, YYYYMMDD, DD-MM-YYYY, DD/MM/YYYY
static DATED_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \d{4}-\d{2}-\d{2}
        | \d{4}/\d{2}/\d{2}
        | \d{2}-\d{2}-\d{4}
        | \d{2}/\d{2}/\d{4}
        | (?:^|[^\d])\d{8}(?:[^\d]|$)
        ",
    )
    .expect("hardcoded regex pattern is valid")
});

/// Scope and validity filter for discovered links
///
/// A pure predicate over a normalized URL: no I/O, no mutation, and the
/// same answer for the same URL and configuration every time. Failures are
/// silent rejections; nothing here is an error.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    allowed_domains: Vec<String>,
    excluded_hosts: HashSet<String>,
    extension_denylist: HashSet<String>,
    max_query_params: usize,
    exclude_dated_paths: bool,
}

impl ScopeFilter {
    /// Builds a filter from the scope section of the configuration
    pub fn new(config: &ScopeConfig) -> Self {
        Self {
            // Hosts are compared lowercased, so patterns must be too
            allowed_domains: config
                .allowed_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            excluded_hosts: config
                .excluded_hosts
                .iter()
                .map(|h| h.to_lowercase())
                .collect(),
            extension_denylist: config
                .extension_denylist
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            max_query_params: config.max_query_params,
            exclude_dated_paths: config.exclude_dated_paths,
        }
    }

    /// Decides whether a normalized URL is eligible for crawling
    ///
    /// All rules must pass:
    /// 1. Scheme is http or https
    /// 2. Host matches an allowed domain pattern and is not excluded
    /// 3. No pagination/enumeration path segment (infinite-trap heuristic)
    /// 4. No date-stamped path, if date exclusion is enabled
    /// 5. Distinct query-parameter keys within the configured maximum
    /// 6. Path extension not in the denylist
    ///
    /// The pagination and date heuristics trade precision for trap
    /// avoidance: a legitimate "/page3" is lost along with the calendar
    /// traps.
    pub fn in_scope(&self, url: &Url) -> bool {
        self.scheme_allowed(url)
            && self.host_allowed(url)
            && !self.path_is_enumeration(url)
            && !self.path_is_dated(url)
            && self.query_params_within_limit(url)
            && !self.extension_denied(url)
    }

    fn scheme_allowed(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    fn host_allowed(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        if self.excluded_hosts.contains(&host) {
            return false;
        }

        self.allowed_domains
            .iter()
            .any(|pattern| matches_wildcard(pattern, &host))
    }

    /// Detects pagination-style path segments: a purely numeric segment,
    /// a "pageNNN" segment, or a single trailing lowercase letter
    fn path_is_enumeration(&self, url: &Url) -> bool {
        let segments: Vec<&str> = match url.path_segments() {
            Some(s) => s.filter(|s| !s.is_empty()).collect(),
            None => return false,
        };

        for (i, segment) in segments.iter().enumerate() {
            let lower = segment.to_lowercase();

            if !lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit()) {
                return true;
            }

            if PAGINATION_SEGMENT.is_match(&lower) {
                return true;
            }

            let is_last = i == segments.len() - 1;
            if is_last && segment.len() == 1 && segment.chars().all(|c| c.is_ascii_lowercase()) {
                return true;
            }
        }

        false
    }

    fn path_is_dated(&self, url: &Url) -> bool {
        self.exclude_dated_paths && DATED_PATH.is_match(url.path())
    }

    fn query_params_within_limit(&self, url: &Url) -> bool {
        let distinct_keys: HashSet<String> =
            url.query_pairs().map(|(k, _)| k.to_string()).collect();
        distinct_keys.len() <= self.max_query_params
    }

    fn extension_denied(&self, url: &Url) -> bool {
        let path = url.path().to_lowercase();
        let last_segment = path.rsplit('/').next().unwrap_or("");

        match last_segment.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.extension_denylist.contains(ext),
            _ => false,
        }
    }
}
