use crate::scoring::Transliteration;
use crate::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Absolute maximum number of pages a single crawl may visit
pub const SEARCH_LIMIT: usize = 10_000;

/// Main configuration structure for Topical-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    /// Character substitutions applied to terms and page text
    ///
    /// Absent means the built-in Icelandic table; an empty table disables
    /// substitution.
    #[serde(default)]
    pub transliteration: Option<BTreeMap<String, String>>,
}

impl Config {
    /// Builds the transliteration table this configuration describes
    pub fn transliteration_table(&self) -> Result<Transliteration, ConfigError> {
        match &self.transliteration {
            Some(entries) => Transliteration::from_entries(entries),
            None => Ok(Transliteration::icelandic()),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to dispatch
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Minimum time between any two dispatches (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Minimum time between dispatches to the same host (milliseconds)
    #[serde(rename = "per-host-delay-ms")]
    pub per_host_delay_ms: Option<u64>,

    /// Whole-request timeout for a page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// First wait when the frontier is empty but fetches are in flight (milliseconds)
    #[serde(rename = "frontier-backoff-ms")]
    pub frontier_backoff_ms: u64,

    /// Upper bound for the empty-frontier wait (milliseconds)
    #[serde(rename = "frontier-max-backoff-ms")]
    pub frontier_max_backoff_ms: u64,

    /// Bonus per query word for links found on a relevant page
    #[serde(rename = "relevance-multiplier")]
    pub relevance_multiplier: f64,

    /// Whether robots.txt is consulted before each fetch
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: SEARCH_LIMIT,
            max_concurrent_fetches: 8,
            politeness_delay_ms: 300,
            per_host_delay_ms: None,
            fetch_timeout_secs: 30,
            frontier_backoff_ms: 10,
            frontier_max_backoff_ms: 500,
            relevance_multiplier: 3.0,
            respect_robots: true,
        }
    }
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn per_host_delay(&self) -> Option<Duration> {
        self.per_host_delay_ms.map(Duration::from_millis)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn frontier_backoff(&self) -> Duration {
        Duration::from_millis(self.frontier_backoff_ms)
    }

    pub fn frontier_max_backoff(&self) -> Duration {
        Duration::from_millis(self.frontier_max_backoff_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "RuBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version`, followed by `(+ContactURL; ContactEmail)` when
    /// contact details are configured.
    pub fn user_agent_string(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.max_pages, SEARCH_LIMIT);
        assert_eq!(config.crawler.politeness_delay(), Duration::from_millis(300));
        assert!(config.crawler.per_host_delay().is_none());
        assert!(config.crawler.respect_robots);
        assert_eq!(config.user_agent.crawler_name, "RuBot");
    }

    #[test]
    fn test_user_agent_string() {
        let mut ua = UserAgentConfig::default();
        assert_eq!(ua.user_agent_string(), "RuBot/1.0");

        ua.contact_url = Some("https://example.com/bot".to_string());
        ua.contact_email = Some("bot@example.com".to_string());
        assert_eq!(
            ua.user_agent_string(),
            "RuBot/1.0 (+https://example.com/bot; bot@example.com)"
        );
    }

    #[test]
    fn test_default_transliteration_is_icelandic() {
        let config = Config::default();
        let table = config.transliteration_table().unwrap();
        assert_eq!(table, Transliteration::icelandic());
    }

    #[test]
    fn test_empty_transliteration_disables_substitution() {
        let config = Config {
            transliteration: Some(BTreeMap::new()),
            ..Config::default()
        };
        assert!(config.transliteration_table().unwrap().is_empty());
    }
}
