//! Crawl policy module
//!
//! The coordinator asks a [`PolicyGate`] once per popped URL whether it may be
//! fetched. [`RobotsGate`] answers from each site's robots.txt, fetched once
//! per origin and cached; [`AllowAllGate`] allows everything.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::ParsedRobots;

use crate::url::extract_origin;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Decides whether a URL may be crawled
#[async_trait]
pub trait PolicyGate: Send + Sync {
    /// Returns true if `url` may be fetched
    async fn is_allowed(&self, url: &str) -> bool;
}

/// A gate that allows every URL
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllGate;

#[async_trait]
impl PolicyGate for AllowAllGate {
    async fn is_allowed(&self, _url: &str) -> bool {
        true
    }
}

/// A gate backed by each origin's robots.txt
pub struct RobotsGate {
    client: Client,

    /// Product token matched against `User-agent` lines
    agent_token: String,

    /// Rules per origin (`scheme://host[:port]`)
    cache: Mutex<HashMap<String, CachedRobots>>,
}

impl RobotsGate {
    /// Creates a gate
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used to download robots.txt
    /// * `agent_token` - The crawler name matched against robots.txt groups
    pub fn new(client: Client, agent_token: impl Into<String>) -> Self {
        Self {
            client,
            agent_token: agent_token.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the number of origins with cached rules
    pub fn cached_origins(&self) -> usize {
        self.lock_cache().len()
    }

    /// Returns cached rules for an origin unless they are stale
    fn cached(&self, origin: &str) -> Option<ParsedRobots> {
        self.lock_cache()
            .get(origin)
            .filter(|cached| !cached.is_stale())
            .map(|cached| cached.content.clone())
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, CachedRobots>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PolicyGate for RobotsGate {
    async fn is_allowed(&self, url: &str) -> bool {
        let Some(origin) = extract_origin(url) else {
            tracing::debug!("No origin for {}, treating as disallowed", url);
            return false;
        };

        let robots = match self.cached(&origin) {
            Some(robots) => {
                tracing::trace!("Using cached robots.txt for {}", origin);
                robots
            }
            None => {
                // The cache lock is released while the download is in flight
                let robots = fetch_robots(&self.client, &origin).await;
                self.lock_cache()
                    .insert(origin.clone(), CachedRobots::new(robots.clone()));
                robots
            }
        };

        robots.is_allowed(url, &self.agent_token)
    }
}

/// Fetches and parses robots.txt for an origin
///
/// A missing, unreadable or failing robots.txt yields [`ParsedRobots::allow_all`].
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - The origin, e.g. `https://example.com`
pub async fn fetch_robots(client: &Client, origin: &str) -> ParsedRobots {
    let robots_url = format!("{}/robots.txt", origin);
    tracing::debug!("Fetching robots.txt: {}", robots_url);

    match client.get(&robots_url).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => ParsedRobots::from_content(&body),
            Err(e) => {
                tracing::debug!("Unreadable robots.txt at {}: {}", robots_url, e);
                ParsedRobots::allow_all()
            }
        },
        Ok(response) => {
            tracing::debug!(
                "robots.txt at {} returned HTTP {}, allowing all",
                robots_url,
                response.status()
            );
            ParsedRobots::allow_all()
        }
        Err(e) => {
            tracing::debug!("Failed to fetch robots.txt at {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
