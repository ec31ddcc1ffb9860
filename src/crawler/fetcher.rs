//! HTTP fetcher implementation
//!
//! The coordinator only sees the [`Fetcher`] trait: connect to a URL and get
//! back the outbound links and text of the page. [`HttpFetcher`] is the
//! production implementation, built on reqwest and the HTML parser.

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_html;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// A fetched and parsed page
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// URL the content was served from, after redirects
    pub final_url: String,

    /// Absolute outbound links, in document order
    pub links: Vec<String>,

    /// The page text
    pub text: String,
}

/// Fetches pages for the coordinator
///
/// Implementations enforce their own timeouts; any error is treated by the
/// caller as "no data" and never retried.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, identifying as `user_agent`
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<PageResult, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use topical_crawler::config::UserAgentConfig;
/// use topical_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and parses them as HTML
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher using an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// # Request Flow
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection / protocol failure | `FetchError::Network` |
    /// | Non-2xx status | `FetchError::Status` |
    /// | Content-Type present but not HTML | `FetchError::ContentMismatch` |
    /// | Otherwise | links and text parsed from the body |
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<PageResult, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let final_url: Url = response.url().clone();
        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        let parsed = parse_html(&body, &final_url);

        Ok(PageResult {
            final_url: final_url.to_string(),
            links: parsed.links,
            text: parsed.text,
        })
    }
}

/// Missing Content-Type is parsed optimistically
fn is_html(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.is_empty() || lower.contains("text/html") || lower.contains("application/xhtml+xml")
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_builder() {
        FetchError::InvalidUrl {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
        HttpFetcher::new(client)
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("application/xhtml+xml"));
        assert!(is_html(""));
        assert!(!is_html("application/pdf"));
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/"))
            .and(header("user-agent", "TestBot/1.0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    r#"<html><body><p>A breaking story</p><a href="/next">Next</a></body></html>"#,
                    "text/html",
                ),
            )
            .mount(&server)
            .await;

        let page = fetcher()
            .fetch(&format!("{}/news/", server.uri()), "TestBot/1.0")
            .await
            .unwrap();

        assert_eq!(page.links, vec![format!("{}/next", server.uri())]);
        assert!(page.text.contains("A breaking story"));
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = fetcher().fetch(&format!("{}/missing/", server.uri()), "TestBot/1.0").await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_non_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "application/pdf"),
            )
            .mount(&server)
            .await;

        let result = fetcher().fetch(&format!("{}/doc/", server.uri()), "TestBot/1.0").await;
        assert!(matches!(result, Err(FetchError::ContentMismatch { .. })));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is not expected to be listening on localhost
        let result = fetcher().fetch("http://127.0.0.1:9/", "TestBot/1.0").await;
        assert!(result.is_err());
    }
}
