//! Corpus statistics
//!
//! Running aggregates mutated by every accepted page: the word-frequency
//! table, the longest-page record, and per-subdomain page sets. All
//! operations are safe under concurrent invocation from multiple workers.

mod dedup;
pub mod report;

pub use dedup::{ContentFingerprint, DuplicateDetector};

use dashmap::{DashMap, DashSet};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use url::Url;

/// The page with the most filtered tokens seen so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongestPage {
    pub url: String,
    pub token_count: usize,
}

/// Process-lifetime corpus aggregates
///
/// Counters use per-key atomic updates so no increment is lost under
/// concurrent writers; the longest-page record sits behind a mutex that is
/// held only for the compare-and-replace.
#[derive(Debug)]
pub struct CorpusStats {
    word_freq: DashMap<String, u64>,
    longest: Mutex<Option<LongestPage>>,
    subdomain_pages: DashMap<String, BTreeSet<String>>,
    primary_domain: String,
}

impl CorpusStats {
    /// Creates empty aggregates tracking subdomains of `primary_domain`
    pub fn new(primary_domain: impl Into<String>) -> Self {
        Self {
            word_freq: DashMap::new(),
            longest: Mutex::new(None),
            subdomain_pages: DashMap::new(),
            primary_domain: primary_domain.into(),
        }
    }

    /// Increments the global count for each token
    pub fn record_words(&self, tokens: &[String]) {
        for token in tokens {
            self.word_freq
                .entry(token.clone())
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    /// Replaces the longest-page record iff this count strictly exceeds the
    /// current maximum; ties keep the first recorded page
    pub fn record_if_longest(&self, url: &Url, token_count: usize) {
        let mut longest = self.longest.lock().expect("longest-page lock poisoned");

        let beats_current = match longest.as_ref() {
            Some(current) => token_count > current.token_count,
            None => true,
        };

        if beats_current {
            *longest = Some(LongestPage {
                url: url.to_string(),
                token_count,
            });
        }
    }

    /// Adds the URL to its host's page set when the host is a subdomain of
    /// the primary tracked domain
    ///
    /// The bare `www.` root host is not a subdomain for reporting purposes
    /// and is skipped, as is the apex domain itself.
    pub fn record_subdomain_page(&self, url: &Url) {
        let Some(host) = url.host_str() else {
            return;
        };
        let host = host.to_lowercase();

        let suffix = format!(".{}", self.primary_domain);
        let root_www = format!("www.{}", self.primary_domain);

        if !host.ends_with(&suffix) || host == root_www {
            return;
        }

        self.subdomain_pages
            .entry(host)
            .or_default()
            .insert(url.to_string());
    }
}

/// Shared per-run session state: statistics, the duplicate detector, and
/// the set of already-accepted canonical URLs
///
/// Constructed once per crawl run, injected into every pipeline instance,
/// read via `snapshot` at shutdown, and discarded with the run.
#[derive(Debug)]
pub struct CrawlSession {
    pub stats: CorpusStats,
    pub dedup: DuplicateDetector,
    visited: DashSet<String>,
}

impl CrawlSession {
    pub fn new(primary_domain: impl Into<String>) -> Self {
        Self {
            stats: CorpusStats::new(primary_domain),
            dedup: DuplicateDetector::new(),
            visited: DashSet::new(),
        }
    }

    /// Atomically records a canonical URL as entering acceptance
    ///
    /// Returns true on first arrival; false means the URL was already
    /// processed (an infinite-trap revisit).
    pub fn mark_visited(&self, url: &Url) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Takes a consistent-at-some-instant copy of all aggregates
    ///
    /// Each structure is copied independently; a page accepted mid-snapshot
    /// may appear in one table and not another, which reporting tolerates.
    /// Never blocks indefinitely on concurrent writers.
    pub fn snapshot(&self) -> CorpusSnapshot {
        let word_freq: HashMap<String, u64> = self
            .stats
            .word_freq
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        let longest = self
            .stats
            .longest
            .lock()
            .expect("longest-page lock poisoned")
            .clone();

        let subdomain_pages: BTreeMap<String, BTreeSet<String>> = self
            .stats
            .subdomain_pages
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        CorpusSnapshot {
            total_unique_pages: self.dedup.len(),
            word_freq,
            longest,
            subdomain_pages,
        }
    }
}

/// Immutable copy of the corpus aggregates, taken at report time
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    /// Number of unique accepted pages (one per distinct fingerprint)
    pub total_unique_pages: usize,

    /// Global word-frequency table
    pub word_freq: HashMap<String, u64>,

    /// The page with the most filtered tokens
    pub longest: Option<LongestPage>,

    /// Page sets per subdomain of the primary tracked domain,
    /// lexicographically ordered
    pub subdomain_pages: BTreeMap<String, BTreeSet<String>>,
}

impl CorpusSnapshot {
    /// The `n` highest-frequency words, most frequent first; ties break
    /// alphabetically for reproducible reports
    pub fn top_words(&self, n: usize) -> Vec<(String, u64)> {
        let mut words: Vec<(String, u64)> = self
            .word_freq
            .iter()
            .map(|(w, c)| (w.clone(), *c))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(n);
        words
    }
}
