//! Worker loop
//!
//! Each worker independently pulls one URL at a time from the frontier,
//! fetches it, runs it through the page pipeline, and pushes accepted
//! links back. Workers share no state beyond the gate, session, and
//! frontier they are handed.

use crate::crawler::{FetchTransport, Frontier};
use crate::pipeline::{PageDecision, PagePipeline};
use crate::robots::RobotsGate;
use std::sync::Arc;
use std::time::Duration;

/// Runs one worker until the frontier is exhausted
///
/// Between fetches the worker sleeps the configured delay, or the host's
/// robots `Crawl-delay` when that is longer. Every dispensed URL is marked
/// complete regardless of its pipeline outcome; no single page failure
/// stops the crawl.
pub async fn run_worker(
    worker_id: u32,
    frontier: Arc<dyn Frontier>,
    transport: Arc<dyn FetchTransport>,
    pipeline: Arc<PagePipeline>,
    gate: Arc<RobotsGate>,
    base_delay: Duration,
) {
    loop {
        let Some(url) = frontier.next_url() else {
            tracing::info!("Worker {}: frontier is empty, stopping", worker_id);
            break;
        };

        let response = transport.fetch(&url).await;
        tracing::info!(
            "Worker {}: downloaded {}, status <{}>",
            worker_id,
            url,
            response.status
        );

        match pipeline.process(&response, &url).await {
            PageDecision::Accepted { links } => {
                tracing::debug!(
                    "Worker {}: {} yielded {} links",
                    worker_id,
                    url,
                    links.len()
                );
                for link in links {
                    frontier.add_url(link);
                }
            }
            PageDecision::Rejected(reason) => {
                tracing::debug!("Worker {}: {} rejected: {:?}", worker_id, url, reason);
            }
        }

        frontier.mark_complete(&url);

        let delay = gate
            .cached_crawl_delay(&url)
            .filter(|requested| *requested > base_delay)
            .unwrap_or(base_delay);
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeConfig;
    use crate::crawler::{FetchResult, MemoryFrontier};
    use crate::robots::{RobotsPolicy, RobotsRules};
    use crate::stats::CrawlSession;
    use crate::text::Tokenizer;
    use crate::url::ScopeFilter;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use url::Url;

    /// Canned transport serving an in-memory site
    struct FakeTransport {
        pages: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl FetchTransport for FakeTransport {
        async fn fetch(&self, url: &Url) -> FetchResult {
            match self.pages.get(url.as_str()) {
                Some(body) => FetchResult {
                    url: url.to_string(),
                    status: 200,
                    content: Some(body.clone()),
                    error: None,
                },
                None => FetchResult {
                    url: url.to_string(),
                    status: 404,
                    content: None,
                    error: None,
                },
            }
        }
    }

    fn body_with_words(count: usize, links: &[&str]) -> Vec<u8> {
        let mut body = String::from("<html><body><p>");
        for i in 0..count {
            let first = (b'a' + (i / 26 % 26) as u8) as char;
            let second = (b'a' + (i % 26) as u8) as char;
            body.push_str(&format!("word{}{} ", first, second));
        }
        body.push_str("</p>");
        for link in links {
            body.push_str(&format!("<a href=\"{}\">the</a>", link));
        }
        body.push_str("</body></html>");
        body.into_bytes()
    }

    #[tokio::test]
    async fn test_worker_drains_frontier_and_follows_links() {
        let gate = Arc::new(RobotsGate::new(
            reqwest::Client::new(),
            "Lexiscope/0.1",
            Duration::from_secs(5),
            100_000_000,
        ));
        gate.preload(
            "www.ics.uci.edu",
            RobotsPolicy::new("www.ics.uci.edu", RobotsRules::allow_all()),
        );

        let session = Arc::new(CrawlSession::new("ics.uci.edu"));
        let pipeline = Arc::new(PagePipeline::new(
            Arc::clone(&gate),
            Arc::clone(&session),
            ScopeFilter::new(&ScopeConfig {
                allowed_domains: vec!["*.ics.uci.edu".to_string()],
                excluded_hosts: vec![],
                max_query_params: 5,
                exclude_dated_paths: false,
                extension_denylist: vec![],
                primary_domain: "ics.uci.edu".to_string(),
            }),
            Tokenizer::new(),
            10,
        ));

        let mut pages = HashMap::new();
        pages.insert(
            "https://www.ics.uci.edu/".to_string(),
            body_with_words(40, &["/about"]),
        );
        pages.insert(
            "https://www.ics.uci.edu/about".to_string(),
            body_with_words(80, &[]),
        );
        let transport: Arc<dyn FetchTransport> = Arc::new(FakeTransport { pages });

        let frontier = Arc::new(MemoryFrontier::new());
        frontier.add_url(Url::parse("https://www.ics.uci.edu/").unwrap());
        let frontier_dyn: Arc<dyn Frontier> = frontier.clone();

        run_worker(
            0,
            frontier_dyn,
            transport,
            pipeline,
            gate,
            Duration::from_millis(0),
        )
        .await;

        // Seed plus the discovered /about link
        assert_eq!(frontier.completed_count(), 2);
        assert_eq!(session.snapshot().total_unique_pages, 2);
    }
}
