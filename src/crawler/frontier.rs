//! Frontier boundary
//!
//! The work queue of not-yet-fetched URLs. The crawl core only depends on
//! the trait; the in-memory implementation here covers single-process runs
//! and tests. Persistence and completion recovery stay outside this crate.

use dashmap::DashSet;
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

/// External work-queue interface consumed by the workers
pub trait Frontier: Send + Sync {
    /// Next URL to fetch; None signals exhaustion
    fn next_url(&self) -> Option<Url>;

    /// Offers a discovered URL for future fetching
    fn add_url(&self, url: Url);

    /// Marks a previously-dispensed URL as fully processed
    fn mark_complete(&self, url: &Url);
}

/// In-memory FIFO frontier with scheduling-level deduplication
///
/// A URL is dispensed at most once per run regardless of how many pages
/// link to it.
#[derive(Debug, Default)]
pub struct MemoryFrontier {
    queue: Mutex<VecDeque<Url>>,
    scheduled: DashSet<String>,
    completed: DashSet<String>,
}

impl MemoryFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs marked complete so far
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }
}

impl Frontier for MemoryFrontier {
    fn next_url(&self) -> Option<Url> {
        self.queue
            .lock()
            .expect("frontier queue lock poisoned")
            .pop_front()
    }

    fn add_url(&self, url: Url) {
        // First scheduling wins; later discoveries of the same URL are noise
        if !self.scheduled.insert(url.to_string()) {
            return;
        }
        self.queue
            .lock()
            .expect("frontier queue lock poisoned")
            .push_back(url);
    }

    fn mark_complete(&self, url: &Url) {
        self.completed.insert(url.to_string());
    }
}
