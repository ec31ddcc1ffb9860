//! Topical-Crawler: a best-first, topic-focused web crawler
//!
//! This crate explores the web from a seed URL, ordering its frontier by how
//! relevant each discovered link looks for a topic and query phrase, and
//! reports the pages whose text contains the query phrase.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod robots;
pub mod scoring;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl construction and control
///
/// Nothing that happens while the crawl is running is fatal; these errors
/// surface only while setting a crawl up or when the phase machine is misused.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Seed URL cannot be crawled: {url}")]
    InvalidSeed { url: String },

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons a raw link cannot be canonicalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Page fetch failures
///
/// The coordinator treats every variant the same way: the page yields no
/// links and is not retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Fetcher, HttpFetcher, PageResult};
pub use frontier::{Frontier, ScoredUrl};
pub use output::CrawlSummary;
pub use robots::{AllowAllGate, PolicyGate, RobotsGate};
pub use scoring::{QueryTerms, Scorer, Transliteration};
pub use state::CrawlPhase;
pub use url::{canonicalize, try_canonicalize, CanonicalUrl};
