//! HTML content extraction
//!
//! Pulls visible text and outbound hyperlinks out of a fetched page body.
//! Parsing is lenient: unclosed tags and invalid nesting still yield
//! whatever text and links can be recovered.

use scraper::node::Node;
use scraper::{Html, Selector};
use thiserror::Error;

/// Elements whose text content is never visible to a reader
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extraction failures
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Content looks like binary data, not HTML")]
    BinaryContent,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Visible text content, in document order
    pub text: String,

    /// Raw href values from `<a>` tags, in document order
    pub hyperlinks: Vec<String>,
}

/// Parses a raw response body and extracts visible text and hyperlinks
///
/// The body is decoded as UTF-8 with lossy replacement, so mislabelled
/// encodings degrade to replacement characters rather than failures. Only
/// bodies that look like binary data (NUL bytes near the start) are
/// rejected.
///
/// # Arguments
///
/// * `content` - The raw response bytes
///
/// # Returns
///
/// * `Ok(ExtractedPage)` - Recovered text and links, possibly empty
/// * `Err(ExtractError)` - The body is not HTML at all
pub fn extract_page(content: &[u8]) -> Result<ExtractedPage, ExtractError> {
    let sniff_len = content.len().min(1024);
    if content[..sniff_len].contains(&0) {
        return Err(ExtractError::BinaryContent);
    }

    let html = String::from_utf8_lossy(content);
    let document = Html::parse_document(&html);

    Ok(ExtractedPage {
        text: visible_text(&document),
        hyperlinks: raw_hrefs(&document),
    })
}

/// Collects the text of every node outside script/style subtrees
fn visible_text(document: &Html) -> String {
    let mut out = String::new();

    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(e) if INVISIBLE_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(trimmed);
        }
    }

    out
}

/// Collects raw href strings from `<a href>` tags in document order
fn raw_hrefs(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let page = extract_page(b"<html><body><p>Hello world</p></body></html>").unwrap();
        assert_eq!(page.text, "Hello world");
    }

    #[test]
    fn test_script_and_style_excluded() {
        let html = b"<html><head><style>body { color: red; }</style>\
            <script>var x = 1;</script></head>\
            <body><p>Visible</p><noscript>fallback</noscript></body></html>";
        let page = extract_page(html).unwrap();
        assert_eq!(page.text, "Visible");
    }

    #[test]
    fn test_extract_links_in_order() {
        let html = b"<html><body>\
            <a href=\"/first\">One</a>\
            <a href=\"https://cs.ics.uci.edu/second\">Two</a>\
            <a href=\"third.html\">Three</a>\
            </body></html>";
        let page = extract_page(html).unwrap();
        assert_eq!(
            page.hyperlinks,
            vec!["/first", "https://cs.ics.uci.edu/second", "third.html"]
        );
    }

    #[test]
    fn test_anchor_without_href_skipped() {
        let page = extract_page(b"<html><body><a name=\"top\">Anchor</a></body></html>").unwrap();
        assert!(page.hyperlinks.is_empty());
        assert_eq!(page.text, "Anchor");
    }

    #[test]
    fn test_empty_href_skipped() {
        let page = extract_page(b"<html><body><a href=\"  \">blank</a></body></html>").unwrap();
        assert!(page.hyperlinks.is_empty());
    }

    #[test]
    fn test_malformed_markup_recovers() {
        let html = b"<html><body><p>Unclosed paragraph <a href=\"/link\">text<div>nested badly";
        let page = extract_page(html).unwrap();
        assert!(page.text.contains("Unclosed paragraph"));
        assert_eq!(page.hyperlinks, vec!["/link"]);
    }

    #[test]
    fn test_binary_content_rejected() {
        let mut body = b"GIF89a".to_vec();
        body.extend_from_slice(&[0u8, 1, 2, 3, 0, 0]);
        assert!(matches!(
            extract_page(&body),
            Err(ExtractError::BinaryContent)
        ));
    }

    #[test]
    fn test_text_joined_across_elements() {
        let html = b"<html><body><h1>Title</h1><p>Body text</p></body></html>";
        let page = extract_page(html).unwrap();
        assert_eq!(page.text, "Title Body text");
    }

    #[test]
    fn test_empty_body() {
        let page = extract_page(b"<html><body></body></html>").unwrap();
        assert!(page.text.is_empty());
        assert!(page.hyperlinks.is_empty());
    }
}
