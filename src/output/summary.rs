use crate::scoring::QueryTerms;
use std::io::{self, Write};
use std::time::Duration;

/// Results of one finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// Canonical seed URL
    pub seed: String,

    /// The query phrase as given
    pub query: String,

    /// Pages dispatched for fetching (policy-allowed)
    pub pages_crawled: usize,

    /// Dispatched pages that were fetched and parsed
    pub pages_fetched: usize,

    /// Dispatched pages that yielded no data
    pub fetch_failures: usize,

    /// URLs skipped because the crawl policy disallowed them
    pub disallowed: usize,

    /// Pages whose text contains the query phrase, in completion order
    pub relevant_pages: Vec<String>,

    /// Distinct canonical URLs ever queued
    pub distinct_urls: usize,

    /// Distinct hosts fetches were dispatched to
    pub hosts_contacted: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Number of pages that matched the query
    pub fn relevant_count(&self) -> usize {
        self.relevant_pages.len()
    }

    /// Pages crawled per second
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_crawled as f64 / secs
        } else {
            0.0
        }
    }
}

/// Writes the crawl summary in a human-readable form
///
/// # Arguments
///
/// * `summary` - The summary to render
/// * `out` - Destination writer
pub fn write_summary<W: Write>(summary: &CrawlSummary, out: &mut W) -> io::Result<()> {
    writeln!(out, "=== Crawl Summary ===")?;
    writeln!(out)?;
    writeln!(out, "Seed: {}", summary.seed)?;
    writeln!(out, "Query: \"{}\"", summary.query)?;
    writeln!(out)?;

    writeln!(out, "Pages crawled: {}", summary.pages_crawled)?;
    writeln!(out, "  Fetched: {}", summary.pages_fetched)?;
    writeln!(out, "  Failed: {}", summary.fetch_failures)?;
    writeln!(out, "Disallowed by crawl policy: {}", summary.disallowed)?;
    writeln!(out, "Distinct URLs seen: {}", summary.distinct_urls)?;
    writeln!(out, "Hosts contacted: {}", summary.hosts_contacted)?;
    writeln!(
        out,
        "Elapsed: {:.1}s ({:.2} pages/sec)",
        summary.elapsed.as_secs_f64(),
        summary.pages_per_second()
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "Query found in {} page(s)",
        summary.relevant_count()
    )?;
    for url in &summary.relevant_pages {
        writeln!(out, "  - {}", url)?;
    }

    Ok(())
}

/// Prints the crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write_summary(summary, &mut handle) {
        tracing::warn!("Failed to print summary: {}", e);
    }
}

/// Writes the banner shown before a crawl starts
///
/// Transliterated forms of the topic and query are shown when they differ
/// from what was typed.
pub fn write_start_banner<W: Write>(
    seed: &str,
    terms: &QueryTerms,
    max_pages: usize,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Crawling from {} (up to {} pages)", seed, max_pages)?;
    writeln!(out, "Topic: \"{}\"", terms.original_topic())?;
    writeln!(out, "Query: \"{}\"", terms.original_phrase())?;

    if terms.is_transliterated() {
        writeln!(
            out,
            "Matching as topic \"{}\", query \"{}\"",
            terms.topic(),
            terms.phrase()
        )?;
    }

    Ok(())
}

/// Prints the start banner to stdout
pub fn print_start_banner(seed: &str, terms: &QueryTerms, max_pages: usize) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write_start_banner(seed, terms, max_pages, &mut handle) {
        tracing::warn!("Failed to print banner: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Transliteration;

    fn sample_summary() -> CrawlSummary {
        CrawlSummary {
            seed: "http://example.com/".to_string(),
            query: "breaking story".to_string(),
            pages_crawled: 10,
            pages_fetched: 8,
            fetch_failures: 2,
            disallowed: 1,
            relevant_pages: vec![
                "http://example.com/news/".to_string(),
                "http://example.com/news/today/".to_string(),
            ],
            distinct_urls: 42,
            hosts_contacted: 3,
            elapsed: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = sample_summary();
        assert_eq!(summary.relevant_count(), 2);
        assert!((summary.pages_per_second() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_elapsed_rate() {
        let summary = CrawlSummary::default();
        assert_eq!(summary.pages_per_second(), 0.0);
    }

    #[test]
    fn test_write_summary() {
        let mut out = Vec::new();
        write_summary(&sample_summary(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Pages crawled: 10"));
        assert!(text.contains("Distinct URLs seen: 42"));
        assert!(text.contains("Disallowed by crawl policy: 1"));
        assert!(text.contains("Query found in 2 page(s)"));
        assert!(text.contains("  - http://example.com/news/today/"));
    }

    #[test]
    fn test_banner_shows_transliteration() {
        let terms = QueryTerms::new("Fréttir", "Þjóðin", &Transliteration::icelandic());
        let mut out = Vec::new();
        write_start_banner("http://mbl.is/", &terms, 100, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Topic: \"fréttir\""));
        assert!(text.contains("Matching as topic \"frettir\", query \"thjodin\""));
    }

    #[test]
    fn test_banner_without_transliteration() {
        let terms = QueryTerms::new("news", "breaking story", &Transliteration::icelandic());
        let mut out = Vec::new();
        write_start_banner("http://example.com/", &terms, 1, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!text.contains("Matching as"));
    }
}
