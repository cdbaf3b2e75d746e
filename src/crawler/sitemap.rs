//! Sitemap seeding
//!
//! Mines configured XML sitemaps for `<loc>` entries and feeds the
//! in-scope ones to the frontier before the workers start. Sitemaps are
//! a hint, not a contract: any failure (fetch, malformed XML, bad URL)
//! skips that sitemap and the crawl proceeds from the plain seeds.

use crate::crawler::{FetchTransport, Frontier};
use crate::url::ScopeFilter;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use url::Url;

/// Extracts the text of every `<loc>` element from sitemap XML
///
/// Namespace prefixes are ignored, so `<loc>` and `<sm:loc>` both count.
/// Returns an error only when the document is not well-formed XML.
pub fn parse_sitemap_locs(content: &[u8]) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_reader(content);
    let mut buf = Vec::new();

    let mut locs = Vec::new();
    let mut in_loc = false;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
                text.clear();
            }
            Event::Text(ref e) if in_loc => {
                if let Ok(unescaped) = e.unescape() {
                    text.push_str(&unescaped);
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    locs.push(trimmed.to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(locs)
}

/// Fetches one sitemap and schedules its in-scope entries
///
/// Returns the number of URLs handed to the frontier. Never fails the
/// caller: a broken sitemap logs a warning and seeds nothing.
pub async fn seed_from_sitemap(
    sitemap_url: &str,
    transport: &dyn FetchTransport,
    frontier: &dyn Frontier,
    scope: &ScopeFilter,
) -> usize {
    let url = match Url::parse(sitemap_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Skipping sitemap '{}': {}", sitemap_url, e);
            return 0;
        }
    };

    let response = transport.fetch(&url).await;
    let content = match response.content {
        Some(content) if response.status == 200 && !content.is_empty() => content,
        _ => {
            tracing::warn!(
                "Skipping sitemap {}: status {}, error {:?}",
                sitemap_url,
                response.status,
                response.error
            );
            return 0;
        }
    };

    let locs = match parse_sitemap_locs(&content) {
        Ok(locs) => locs,
        Err(e) => {
            tracing::warn!("Skipping sitemap {}: malformed XML: {}", sitemap_url, e);
            return 0;
        }
    };

    let mut seeded = 0;
    for loc in &locs {
        let Ok(entry) = Url::parse(loc) else {
            continue;
        };
        if scope.in_scope(&entry) {
            frontier.add_url(entry);
            seeded += 1;
        }
    }

    tracing::info!(
        "Sitemap {}: {} entries, {} seeded",
        sitemap_url,
        locs.len(),
        seeded
    );
    seeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeConfig;
    use crate::crawler::{FetchResult, MemoryFrontier};
    use async_trait::async_trait;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://www.ics.uci.edu/about</loc>
    <lastmod>2024-01-15</lastmod>
  </url>
  <url>
    <loc> https://cs.ics.uci.edu/research </loc>
  </url>
  <url>
    <loc>https://example.com/elsewhere</loc>
  </url>
</urlset>"#;

    fn test_scope() -> ScopeFilter {
        ScopeFilter::new(&ScopeConfig {
            allowed_domains: vec!["*.ics.uci.edu".to_string()],
            excluded_hosts: vec![],
            max_query_params: 5,
            exclude_dated_paths: false,
            extension_denylist: vec![],
            primary_domain: "ics.uci.edu".to_string(),
        })
    }

    #[test]
    fn test_parse_locs_in_order() {
        let locs = parse_sitemap_locs(SITEMAP.as_bytes()).unwrap();
        assert_eq!(
            locs,
            vec![
                "https://www.ics.uci.edu/about",
                "https://cs.ics.uci.edu/research",
                "https://example.com/elsewhere"
            ]
        );
    }

    #[test]
    fn test_parse_empty_document() {
        let locs = parse_sitemap_locs(b"<urlset></urlset>").unwrap();
        assert!(locs.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml_errors() {
        // Mismatched end tag
        assert!(parse_sitemap_locs(b"<urlset><url><loc>x</url></loc></urlset>").is_err());
    }

    #[test]
    fn test_parse_namespace_prefixed_loc() {
        let xml = br#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sm:url><sm:loc>https://www.ics.uci.edu/page</sm:loc></sm:url>
        </sm:urlset>"#;
        let locs = parse_sitemap_locs(xml).unwrap();
        assert_eq!(locs, vec!["https://www.ics.uci.edu/page"]);
    }

    struct OneShotTransport {
        status: u16,
        body: Option<Vec<u8>>,
    }

    #[async_trait]
    impl FetchTransport for OneShotTransport {
        async fn fetch(&self, url: &Url) -> FetchResult {
            FetchResult {
                url: url.to_string(),
                status: self.status,
                content: self.body.clone(),
                error: None,
            }
        }
    }

    #[tokio::test]
    async fn test_seed_filters_out_of_scope_entries() {
        let transport = OneShotTransport {
            status: 200,
            body: Some(SITEMAP.as_bytes().to_vec()),
        };
        let frontier = MemoryFrontier::new();

        let seeded = seed_from_sitemap(
            "https://www.ics.uci.edu/post-sitemap.xml",
            &transport,
            &frontier,
            &test_scope(),
        )
        .await;

        assert_eq!(seeded, 2);
        assert_eq!(frontier.next_url().unwrap().path(), "/about");
        assert_eq!(frontier.next_url().unwrap().path(), "/research");
        assert!(frontier.next_url().is_none());
    }

    #[tokio::test]
    async fn test_seed_tolerates_fetch_failure() {
        let transport = OneShotTransport {
            status: 404,
            body: None,
        };
        let frontier = MemoryFrontier::new();

        let seeded = seed_from_sitemap(
            "https://www.ics.uci.edu/post-sitemap.xml",
            &transport,
            &frontier,
            &test_scope(),
        )
        .await;

        assert_eq!(seeded, 0);
        assert!(frontier.next_url().is_none());
    }

    #[tokio::test]
    async fn test_seed_tolerates_malformed_sitemap() {
        let transport = OneShotTransport {
            status: 200,
            body: Some(b"<urlset><loc>x</url></urlset>".to_vec()),
        };
        let frontier = MemoryFrontier::new();

        let seeded = seed_from_sitemap(
            "https://www.ics.uci.edu/post-sitemap.xml",
            &transport,
            &frontier,
            &test_scope(),
        )
        .await;

        assert_eq!(seeded, 0);
        assert!(frontier.next_url().is_none());
    }
}
