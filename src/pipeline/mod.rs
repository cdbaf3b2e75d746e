//! Page pipeline
//!
//! The per-page decision procedure the crawl loop calls for every
//! downloaded page: validate the response, apply the politeness gate,
//! parse and tokenize the content, run duplicate checks, update corpus
//! statistics, and return the filtered outbound link set.

use crate::crawler::FetchResult;
use crate::robots::RobotsGate;
use crate::stats::CrawlSession;
use crate::text::{extract_page, Tokenizer};
use crate::url::{normalize_href, strip_fragment, ScopeFilter};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Why a page was not mined for content and links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 3xx status; redirect-following belongs to the fetch transport
    Redirect,
    /// Non-200 status or empty/absent body
    FetchError,
    /// robots.txt denies this URL for our agent
    RobotsDisallowed,
    /// Body is not recoverable HTML
    Unparseable,
    /// Too few filtered tokens to be worth mining
    LowContent,
    /// Raw body exceeds the configured size ceiling
    TooLarge,
    /// Canonical URL already accepted earlier in the run
    Revisit,
    /// Token sequence fingerprint already seen under another URL
    DuplicateContent,
}

/// Terminal per-page outcome
#[derive(Debug, Clone)]
pub enum PageDecision {
    /// Page accepted; statistics were updated and these links go back to
    /// the frontier
    Accepted { links: HashSet<Url> },
    /// Page skipped; statistics untouched
    Rejected(RejectReason),
}

/// Wires validation, politeness, extraction, deduplication, statistics,
/// and link filtering into one call per downloaded page
///
/// The pipeline itself is stateless; everything shared between workers
/// lives in the injected session and gate.
pub struct PagePipeline {
    gate: Arc<RobotsGate>,
    session: Arc<CrawlSession>,
    scope: ScopeFilter,
    tokenizer: Tokenizer,
    min_tokens: usize,
}

impl PagePipeline {
    pub fn new(
        gate: Arc<RobotsGate>,
        session: Arc<CrawlSession>,
        scope: ScopeFilter,
        tokenizer: Tokenizer,
        min_tokens: usize,
    ) -> Self {
        Self {
            gate,
            session,
            scope,
            tokenizer,
            min_tokens,
        }
    }

    /// Processes one fetched page into a terminal decision
    ///
    /// # Decision order
    ///
    /// 1. Redirect status → `Rejected(Redirect)`
    /// 2. Non-200 or empty body → `Rejected(FetchError)`
    /// 3. robots.txt denial → `Rejected(RobotsDisallowed)`
    /// 4. Unrecoverable body → `Rejected(Unparseable)`
    /// 5. Below the token threshold → `Rejected(LowContent)`; low-information
    ///    pages are not mined for links, so boilerplate-only pages do not
    ///    amplify
    /// 6. Body over the size ceiling → `Rejected(TooLarge)`
    /// 7. Canonical URL accepted before → `Rejected(Revisit)`
    /// 8. Same token fingerprint seen before → `Rejected(DuplicateContent)`,
    ///    statistics untouched
    /// 9. Otherwise statistics are updated and every discovered hyperlink is
    ///    normalized and scope-filtered into the accepted link set
    ///
    /// # Arguments
    ///
    /// * `response` - The fetch transport's result for this page
    /// * `base` - URL of the page, used to resolve relative hrefs
    pub async fn process(&self, response: &FetchResult, base: &Url) -> PageDecision {
        if (300..400).contains(&response.status) {
            tracing::debug!("Skipping {}: redirect status {}", base, response.status);
            return PageDecision::Rejected(RejectReason::Redirect);
        }

        let content = match &response.content {
            Some(content) if response.status == 200 && !content.is_empty() => content,
            _ => {
                tracing::warn!(
                    "Fetch of {} failed: status {}, error {:?}",
                    base,
                    response.status,
                    response.error
                );
                return PageDecision::Rejected(RejectReason::FetchError);
            }
        };

        if !self.gate.allowed(base).await {
            tracing::debug!("Skipping {}: disallowed by robots.txt", base);
            return PageDecision::Rejected(RejectReason::RobotsDisallowed);
        }

        let page = match extract_page(content) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", base, e);
                return PageDecision::Rejected(RejectReason::Unparseable);
            }
        };

        let tokens = self.tokenizer.tokenize(&page.text);
        if tokens.len() < self.min_tokens {
            tracing::debug!(
                "Skipping {}: {} tokens below threshold {}",
                base,
                tokens.len(),
                self.min_tokens
            );
            return PageDecision::Rejected(RejectReason::LowContent);
        }

        if !self.gate.within_size_limit(content.len() as u64) {
            tracing::debug!("Skipping {}: {} bytes over size ceiling", base, content.len());
            return PageDecision::Rejected(RejectReason::TooLarge);
        }

        let canonical = strip_fragment(base);

        if !self.session.mark_visited(&canonical) {
            tracing::debug!("Skipping {}: already accepted this run", canonical);
            return PageDecision::Rejected(RejectReason::Revisit);
        }

        if self.session.dedup.is_duplicate(&canonical, &tokens) {
            return PageDecision::Rejected(RejectReason::DuplicateContent);
        }

        self.session.stats.record_words(&tokens);
        self.session.stats.record_if_longest(&canonical, tokens.len());
        self.session.stats.record_subdomain_page(&canonical);

        let mut links = HashSet::new();
        for href in &page.hyperlinks {
            // Malformed hrefs are dropped, not reported
            let Ok(normalized) = normalize_href(href, base) else {
                continue;
            };
            if self.scope.in_scope(&normalized) {
                links.insert(normalized);
            }
        }

        tracing::debug!(
            "Accepted {}: {} tokens, {} in-scope links",
            canonical,
            tokens.len(),
            links.len()
        );

        PageDecision::Accepted { links }
    }
}
