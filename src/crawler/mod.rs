//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing and link extraction
//! - Dispatch scheduling and rate limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, PageResult};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CrawlError;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and canonicalize the seed
/// 2. Build the HTTP client and crawl policy
/// 3. Fetch pages best-first until the page limit or frontier exhaustion
/// 4. Return the crawl summary
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL the crawl starts from
/// * `topic` - The topic term
/// * `query` - The phrase searched for in page text
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(CrawlError)` - The crawl could not be set up
pub async fn crawl(
    config: Config,
    seed: &str,
    topic: &str,
    query: &str,
) -> Result<CrawlSummary, CrawlError> {
    Coordinator::with_http(config, seed, topic, query)?
        .run()
        .await
}
