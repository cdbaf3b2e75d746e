//! Politeness gate
//!
//! Per-host robots.txt policy cache. The first query for a host fetches
//! and parses `{scheme}://{host}/robots.txt`; every later query consults
//! the cache with no network access. Fetch and parse failures cache a
//! deny-all policy: the gate fails closed and never raises.

mod cache;
mod parser;

pub use cache::RobotsPolicy;
pub use parser::RobotsRules;

use crate::url::host_key;
use dashmap::DashMap;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

/// Answers "may I fetch this URL as this agent" and "is this body within
/// the response-size limit"
///
/// # Concurrency
///
/// The fetch-and-cache step runs at most once per host. Concurrent first
/// requesters for the same host wait on the in-flight fetch (per-host
/// `OnceCell`) rather than racing a duplicate request; the wait is bounded
/// by the robots fetch timeout, after which the host resolves to deny-all.
/// Readers of an existing entry never block on the network.
pub struct RobotsGate {
    client: Client,
    user_agent: String,
    fetch_timeout: Duration,
    max_content_bytes: u64,
    cache: DashMap<String, Arc<OnceCell<RobotsPolicy>>>,
}

impl RobotsGate {
    /// Creates a gate with an empty policy cache
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for the one-time robots fetches
    /// * `user_agent` - Agent string evaluated against robots rules
    /// * `fetch_timeout` - Upper bound on each robots fetch
    /// * `max_content_bytes` - Response-size ceiling for `within_size_limit`
    pub fn new(
        client: Client,
        user_agent: impl Into<String>,
        fetch_timeout: Duration,
        max_content_bytes: u64,
    ) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            fetch_timeout,
            max_content_bytes,
            cache: DashMap::new(),
        }
    }

    /// Checks whether the configured agent may fetch this URL
    ///
    /// URLs without a host fail closed.
    pub async fn allowed(&self, url: &Url) -> bool {
        let Some(host) = host_key(url) else {
            return false;
        };

        // Clone the cell out of the shard before awaiting so no map lock
        // is held across the fetch.
        let cell = self.cache.entry(host.clone()).or_default().clone();

        let policy = cell
            .get_or_init(|| self.fetch_policy(url, host))
            .await;

        policy.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Compares a content length against the configured ceiling
    pub fn within_size_limit(&self, content_length: u64) -> bool {
        content_length <= self.max_content_bytes
    }

    /// Crawl delay requested by the URL's host, from the cached policy only
    ///
    /// Returns None when the host has no cached policy yet; this never
    /// triggers a fetch. A delay too large to represent is treated as
    /// absent rather than trusted.
    pub fn cached_crawl_delay(&self, url: &Url) -> Option<Duration> {
        let host = host_key(url)?;
        let cell = self.cache.get(&host)?.value().clone();
        let delay = cell.get()?.crawl_delay(&self.user_agent)?;
        Duration::try_from_secs_f64(delay).ok()
    }

    /// Seeds the cache with a policy for a host
    ///
    /// Used by tests and by callers that obtain robots data out of band.
    /// A policy already cached for the host wins; seeding never replaces.
    pub fn preload(&self, host: impl Into<String>, policy: RobotsPolicy) {
        let cell = self.cache.entry(host.into()).or_default().clone();
        let _ = cell.set(policy);
    }

    /// Fetches and parses robots.txt for a host, failing closed
    async fn fetch_policy(&self, url: &Url, host: String) -> RobotsPolicy {
        let mut robots_url = url.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        let response = tokio::time::timeout(
            self.fetch_timeout,
            self.client.get(robots_url.as_str()).send(),
        )
        .await;

        let rules = match response {
            Ok(Ok(resp)) if resp.status().is_success() => match resp.text().await {
                Ok(body) => {
                    tracing::debug!("Fetched robots.txt for {} ({} bytes)", host, body.len());
                    RobotsRules::from_content(&body)
                }
                Err(e) => {
                    tracing::warn!("Failed reading robots.txt body for {}: {}", host, e);
                    RobotsRules::deny_all()
                }
            },
            Ok(Ok(resp)) => {
                tracing::warn!(
                    "robots.txt for {} returned status {}, denying host",
                    host,
                    resp.status()
                );
                RobotsRules::deny_all()
            }
            Ok(Err(e)) => {
                tracing::warn!("Failed fetching robots.txt for {}: {}", host, e);
                RobotsRules::deny_all()
            }
            Err(_) => {
                tracing::warn!(
                    "robots.txt fetch for {} timed out after {:?}, denying host",
                    host,
                    self.fetch_timeout
                );
                RobotsRules::deny_all()
            }
        };

        RobotsPolicy::new(host, rules)
    }
}
