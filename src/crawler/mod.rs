//! Crawl loop module
//!
//! The boundary traits (frontier, fetch transport), the worker loop, and
//! the run orchestration that wires configuration into a session, spawns
//! workers, and snapshots statistics when the frontier drains.

mod fetcher;
mod frontier;
mod sitemap;
mod worker;

pub use fetcher::{build_http_client, FetchResult, FetchTransport, HttpTransport};
pub use frontier::{Frontier, MemoryFrontier};
pub use sitemap::{parse_sitemap_locs, seed_from_sitemap};
pub use worker::run_worker;

use crate::pipeline::PagePipeline;
use crate::robots::RobotsGate;
use crate::stats::{CorpusSnapshot, CrawlSession};
use crate::text::Tokenizer;
use crate::url::ScopeFilter;
use crate::{Config, CrawlError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// Runs a complete crawl from the given configuration
///
/// Seeds the frontier, spawns the configured number of workers, waits for
/// the frontier to drain, and returns the final corpus snapshot.
pub async fn crawl(config: Config) -> Result<CorpusSnapshot> {
    let agent = config.user_agent.agent_string();
    let client = build_http_client(&config.user_agent)?;

    let gate = Arc::new(RobotsGate::new(
        client.clone(),
        &agent,
        Duration::from_secs(config.crawler.robots_timeout_secs),
        config.content.max_bytes,
    ));
    let session = Arc::new(CrawlSession::new(&config.scope.primary_domain));
    let scope = ScopeFilter::new(&config.scope);

    let tokenizer = if config.content.stopwords.is_empty() {
        Tokenizer::new()
    } else {
        Tokenizer::with_stopwords(&config.content.stopwords)
    };

    let pipeline = Arc::new(PagePipeline::new(
        Arc::clone(&gate),
        Arc::clone(&session),
        scope.clone(),
        tokenizer,
        config.content.min_tokens,
    ));

    let frontier: Arc<dyn Frontier> = Arc::new(MemoryFrontier::new());
    let transport: Arc<dyn FetchTransport> = Arc::new(HttpTransport::new(client));

    for seed in &config.seeds {
        let url = Url::parse(seed)?;
        if scope.in_scope(&url) {
            frontier.add_url(url);
        } else {
            tracing::warn!("Seed {} is out of scope, skipping", seed);
        }
    }

    // Sitemaps are best-effort extra seeds; a broken one seeds nothing
    for sitemap in &config.sitemaps {
        seed_from_sitemap(sitemap, transport.as_ref(), frontier.as_ref(), &scope).await;
    }

    let delay = Duration::from_millis(config.crawler.time_delay_ms);
    let mut workers = JoinSet::new();

    for worker_id in 0..config.crawler.workers {
        workers.spawn(run_worker(
            worker_id,
            Arc::clone(&frontier),
            Arc::clone(&transport),
            Arc::clone(&pipeline),
            Arc::clone(&gate),
            delay,
        ));
    }

    while let Some(result) = workers.join_next().await {
        result.map_err(|e| CrawlError::Worker(e.to_string()))?;
    }

    tracing::info!("Frontier drained, crawl complete");
    Ok(session.snapshot())
}
