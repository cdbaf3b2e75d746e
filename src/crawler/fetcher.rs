//! HTTP fetch transport
//!
//! Owns everything network-facing for page downloads: client
//! construction, the redirect policy, and the mapping of responses and
//! transport failures into `FetchResult` records.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Result of fetching one URL, as consumed by the page pipeline
///
/// Immutable once constructed. A `status` of 0 with an error message means
/// the transport never got an HTTP response at all.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The URL that was requested
    pub url: String,

    /// HTTP status code, or 0 on transport failure
    pub status: u16,

    /// Response body, when one was received
    pub content: Option<Vec<u8>>,

    /// Transport-level error description, if any
    pub error: Option<String>,
}

/// Boundary trait for the fetch transport
///
/// The pipeline never talks to the network for page bodies; it consumes
/// whatever implementation of this trait the crawl loop was given, which
/// is also the seam tests use to substitute canned responses.
#[async_trait]
pub trait FetchTransport: Send + Sync {
    /// Fetches a URL, following redirects per the transport's own policy
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Builds the HTTP client shared by page fetches and robots fetches
///
/// Redirects are followed by the transport, up to 5 hops; a chain longer
/// than that surfaces as a transport error. The pipeline itself never
/// follows redirects.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.agent_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchTransport for HttpTransport {
    async fn fetch(&self, url: &Url) -> FetchResult {
        let requested = url.to_string();

        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    format!("Request timeout for {}", requested)
                } else if e.is_redirect() {
                    format!("Exceeded the redirect limit for {}", requested)
                } else if e.is_connect() {
                    format!("Connection failed for {}", requested)
                } else {
                    e.to_string()
                };
                return FetchResult {
                    url: requested,
                    status: 0,
                    content: None,
                    error: Some(error),
                };
            }
        };

        let status = response.status().as_u16();

        match response.bytes().await {
            Ok(body) => FetchResult {
                url: requested,
                status,
                content: Some(body.to_vec()),
                error: None,
            },
            Err(e) => FetchResult {
                url: requested,
                status,
                content: None,
                error: Some(format!("Failed reading body: {}", e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "Lexiscope".to_string(),
            crawler_version: "0.1".to_string(),
            contact_url: "https://example.com/bot".to_string(),
            contact_email: "bot@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&test_config()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(build_http_client(&test_config()).unwrap());
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let result = transport.fetch(&url).await;

        assert_eq!(result.status, 200);
        assert_eq!(result.content.unwrap(), b"<html>hi</html>");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_redirect_followed() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(build_http_client(&test_config()).unwrap());
        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        let result = transport.fetch(&url).await;

        assert_eq!(result.status, 200);
        assert_eq!(result.content.unwrap(), b"moved here");
    }

    #[tokio::test]
    async fn test_fetch_connection_failure() {
        let transport = HttpTransport::new(build_http_client(&test_config()).unwrap());
        // Reserved TEST-NET address; nothing listens there
        let url = Url::parse("http://192.0.2.1:9/page").unwrap();
        let result = transport.fetch(&url).await;

        assert_eq!(result.status, 0);
        assert!(result.content.is_none());
        assert!(result.error.is_some());
    }
}
