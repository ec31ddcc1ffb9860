//! Topical-Crawler main entry point
//!
//! This is the command-line interface for the topic-focused crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use topical_crawler::config::{load_config_with_hash, Config, SEARCH_LIMIT};
use topical_crawler::output::{print_start_banner, print_summary};
use topical_crawler::Coordinator;
use tracing_subscriber::EnvFilter;

/// Topical-Crawler: a best-first, topic-focused web crawler
///
/// Starting from a seed URL, the crawler follows the links that look most
/// related to the topic and query, and reports every page whose text
/// contains the query phrase.
#[derive(Parser, Debug)]
#[command(name = "topical-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A best-first, topic-focused web crawler", long_about = None)]
struct Cli {
    /// URL the crawl starts from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Topic term; links mentioning it are explored first
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Phrase to search for in page text
    #[arg(value_name = "QUERY")]
    query: String,

    /// Maximum number of pages to crawl (at most 10000)
    #[arg(value_name = "MAX_PAGES")]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not consult robots.txt
    #[arg(long)]
    ignore_robots: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);

    let max_pages = config.crawler.max_pages;
    let mut coordinator = Coordinator::with_http(config, &cli.seed, &cli.topic, &cli.query)
        .context("Failed to set up crawl")?;

    if !cli.quiet {
        print_start_banner(coordinator.seed().as_str(), coordinator.terms(), max_pages);
    }

    let summary = coordinator.run().await.context("Crawl failed")?;

    if !cli.quiet {
        println!();
        print_summary(&summary);
    }

    Ok(())
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_pages) = cli.max_pages {
        if max_pages > SEARCH_LIMIT {
            tracing::warn!(
                "MAX_PAGES {} exceeds the limit, crawling at most {} pages",
                max_pages,
                SEARCH_LIMIT
            );
        }
        config.crawler.max_pages = max_pages.min(SEARCH_LIMIT);
    }

    if cli.ignore_robots {
        config.crawler.respect_robots = false;
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("topical_crawler=info,warn"),
            1 => EnvFilter::new("topical_crawler=debug,info"),
            2 => EnvFilter::new("topical_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_positional_arguments() {
        let cli = parse(&["topical-crawler", "http://mbl.is", "frettir", "breaking story", "50"]);
        assert_eq!(cli.seed, "http://mbl.is");
        assert_eq!(cli.topic, "frettir");
        assert_eq!(cli.query, "breaking story");
        assert_eq!(cli.max_pages, Some(50));
    }

    #[test]
    fn test_max_pages_is_clamped() {
        let cli = parse(&["topical-crawler", "http://a.com", "t", "q", "50000", "--ignore-robots"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.crawler.max_pages, SEARCH_LIMIT);
        assert!(!config.crawler.respect_robots);
    }

    #[test]
    fn test_defaults_without_overrides() {
        let cli = parse(&["topical-crawler", "http://a.com", "t", "q"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.crawler.max_pages, SEARCH_LIMIT);
        assert!(config.crawler.respect_robots);
    }

    #[test]
    fn test_missing_query_is_rejected() {
        assert!(Cli::try_parse_from(["topical-crawler", "http://a.com", "t"]).is_err());
    }
}
