//! Cached per-host robots policy

use crate::robots::RobotsRules;
use chrono::{DateTime, Duration, Utc};

/// Cached robots policy for a single host
///
/// Created lazily on the first URL seen for the host and kept for the
/// process lifetime. After creation the policy is shared read-only across
/// workers.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// The host this policy applies to (including a port if present)
    pub host: String,

    /// The parsed ruleset
    pub rules: RobotsRules,

    /// When the robots.txt was fetched (or the fetch failed)
    pub fetched_at: DateTime<Utc>,
}

impl RobotsPolicy {
    /// Creates a policy timestamped now
    pub fn new(host: impl Into<String>, rules: RobotsRules) -> Self {
        Self {
            host: host.into(),
            rules,
            fetched_at: Utc::now(),
        }
    }

    /// Age of the cached policy
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks if a URL is allowed under this policy
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.rules.is_allowed(url, user_agent)
    }

    /// Crawl delay requested by the host, if any
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        self.rules.crawl_delay(user_agent)
    }
}
