//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the dispatch loop that ties the crawl together:
//! - Seeding the frontier
//! - Popping the best URL and consulting the crawl policy
//! - Dispatching bounded, rate-limited fetch tasks
//! - Feeding discovered links back through the canonicalizer and scorer
//! - Draining in-flight work and producing the summary

use crate::config::{validate, Config};
use crate::crawler::build_http_client;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::scheduler::Scheduler;
use crate::frontier::{Frontier, ScoredUrl};
use crate::output::CrawlSummary;
use crate::robots::{AllowAllGate, PolicyGate, RobotsGate};
use crate::scoring::{QueryTerms, Scorer};
use crate::state::CrawlPhase;
use crate::url::{canonicalize, try_canonicalize, CanonicalUrl};
use crate::CrawlError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinSet};

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    seed: CanonicalUrl,
    frontier: Arc<Frontier>,
    scorer: Arc<Scorer>,
    scheduler: Scheduler,
    fetcher: Arc<dyn Fetcher>,
    gate: Arc<dyn PolicyGate>,
    user_agent: String,
    phase: CrawlPhase,
}

/// Everything a fetch task needs, shared across tasks
struct TaskContext {
    frontier: Arc<Frontier>,
    scorer: Arc<Scorer>,
    fetcher: Arc<dyn Fetcher>,
    user_agent: String,
}

/// What one fetch task reports back to the dispatch loop
#[derive(Debug)]
struct PageOutcome {
    url: CanonicalUrl,
    fetched: bool,
    relevant: bool,
    links_added: usize,
}

/// Running counters for the summary
#[derive(Debug, Default)]
struct Tally {
    pages_crawled: usize,
    pages_fetched: usize,
    fetch_failures: usize,
    disallowed: usize,
    links_queued: usize,
    relevant_pages: Vec<String>,
}

impl Tally {
    fn record(&mut self, joined: Result<PageOutcome, JoinError>) {
        match joined {
            Ok(outcome) if outcome.fetched => {
                self.pages_fetched += 1;
                self.links_queued += outcome.links_added;
                if outcome.relevant {
                    self.relevant_pages.push(outcome.url.into_string());
                }
            }
            Ok(_) => self.fetch_failures += 1,
            Err(e) => {
                tracing::warn!("Fetch task did not complete: {}", e);
                self.fetch_failures += 1;
            }
        }
    }
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - The URL the crawl starts from
    /// * `topic` - Topic term, rewarded when it appears in link URLs
    /// * `query` - Phrase searched for in page text
    /// * `fetcher` - Fetches pages
    /// * `gate` - Decides whether a URL may be fetched
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Coordinator in the `Init` phase with the seed queued
    /// * `Err(CrawlError)` - Invalid configuration or a seed that cannot be canonicalized
    pub fn new(
        config: Config,
        seed: &str,
        topic: &str,
        query: &str,
        fetcher: Arc<dyn Fetcher>,
        gate: Arc<dyn PolicyGate>,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;

        let table = config.transliteration_table()?;
        let terms = QueryTerms::new(topic, query, &table);
        let scorer = Scorer::new(terms, table, config.crawler.relevance_multiplier);

        let seed = try_canonicalize(seed).map_err(|e| {
            tracing::debug!("Seed {} rejected: {}", seed, e);
            CrawlError::InvalidSeed {
                url: seed.to_string(),
            }
        })?;

        let frontier = Arc::new(Frontier::new());
        frontier.add(seed.clone(), 0.0);

        let user_agent = config.user_agent.user_agent_string();
        let scheduler = Scheduler::new(&config.crawler);

        Ok(Self {
            config,
            seed,
            frontier,
            scorer: Arc::new(scorer),
            scheduler,
            fetcher,
            gate,
            user_agent,
            phase: CrawlPhase::Init,
        })
    }

    /// Creates a coordinator that fetches over HTTP
    ///
    /// robots.txt is honored unless `respect-robots` is off.
    pub fn with_http(
        config: Config,
        seed: &str,
        topic: &str,
        query: &str,
    ) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, config.crawler.fetch_timeout())?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(client.clone()));

        let gate: Arc<dyn PolicyGate> = if config.crawler.respect_robots {
            Arc::new(RobotsGate::new(
                client,
                config.user_agent.crawler_name.clone(),
            ))
        } else {
            tracing::info!("robots.txt checks disabled");
            Arc::new(AllowAllGate)
        };

        Self::new(config, seed, topic, query, fetcher, gate)
    }

    /// The canonical seed URL
    pub fn seed(&self) -> &CanonicalUrl {
        &self.seed
    }

    /// The crawl's frontier
    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    /// The normalized topic and query terms
    pub fn terms(&self) -> &QueryTerms {
        self.scorer.terms()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the crawl to completion
    ///
    /// Dispatches until the page limit is reached or the frontier is exhausted
    /// with nothing in flight, then waits for in-flight fetches and returns
    /// the summary. A coordinator can only be run once.
    pub async fn run(&mut self) -> Result<CrawlSummary, CrawlError> {
        self.phase = self.phase.transition(CrawlPhase::Running)?;
        tracing::info!(
            "Starting crawl from {} (limit {} pages)",
            self.seed,
            self.config.crawler.max_pages
        );

        let start_time = Instant::now();
        let max_pages = self.config.crawler.max_pages;
        let initial_backoff = self.config.crawler.frontier_backoff();
        let max_backoff = self.config.crawler.frontier_max_backoff();

        let context = Arc::new(TaskContext {
            frontier: Arc::clone(&self.frontier),
            scorer: Arc::clone(&self.scorer),
            fetcher: Arc::clone(&self.fetcher),
            user_agent: self.user_agent.clone(),
        });

        let mut tally = Tally::default();
        let mut tasks: JoinSet<PageOutcome> = JoinSet::new();
        let mut backoff = initial_backoff;

        while tally.pages_crawled < max_pages {
            while let Some(joined) = tasks.try_join_next() {
                tally.record(joined);
            }

            let Some(next) = self.frontier.remove_next() else {
                if tasks.is_empty() {
                    tracing::info!(
                        "Frontier exhausted after {} pages",
                        tally.pages_crawled
                    );
                    break;
                }

                tracing::trace!(
                    "Frontier empty with {} fetches in flight, waiting up to {:?}",
                    tasks.len(),
                    backoff
                );
                tokio::select! {
                    _ = self.frontier.wait_non_empty(backoff) => {}
                    Some(joined) = tasks.join_next() => tally.record(joined),
                }
                backoff = (backoff * 2).min(max_backoff);
                continue;
            };
            backoff = initial_backoff;

            if !self.gate.is_allowed(next.url.as_str()).await {
                tracing::debug!("Disallowed by crawl policy: {}", next.url);
                tally.disallowed += 1;
                continue;
            }

            let Some(permit) = self.scheduler.acquire_slot().await else {
                tracing::warn!("Fetch slots closed, stopping dispatch");
                break;
            };
            self.scheduler.wait_for_turn(&next.host).await;

            tally.pages_crawled += 1;
            tracing::debug!(
                "Dispatching {} (score {:.1}, {} in flight)",
                next.url,
                next.score,
                self.scheduler.in_flight()
            );

            let context = Arc::clone(&context);
            tasks.spawn(async move {
                let outcome = process_page(&context, next).await;
                drop(permit);
                outcome
            });

            // Progress reporting every 10 pages
            if tally.pages_crawled % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = tally.pages_crawled as f64 / elapsed.as_secs_f64().max(0.001);
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                    tally.pages_crawled,
                    self.frontier.len(),
                    rate
                );
            }
        }

        self.phase = self.phase.transition(CrawlPhase::Draining)?;
        if !tasks.is_empty() {
            tracing::info!("Waiting for {} in-flight fetches", tasks.len());
        }
        while let Some(joined) = tasks.join_next().await {
            tally.record(joined);
        }

        self.phase = self.phase.transition(CrawlPhase::Done)?;
        let elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} pages crawled, {} relevant, {} links queued, in {:?}",
            tally.pages_crawled,
            tally.relevant_pages.len(),
            tally.links_queued,
            elapsed
        );

        Ok(self.summarize(tally, elapsed))
    }

    fn summarize(&self, tally: Tally, elapsed: Duration) -> CrawlSummary {
        CrawlSummary {
            seed: self.seed.to_string(),
            query: self.scorer.terms().original_phrase().to_string(),
            pages_crawled: tally.pages_crawled,
            pages_fetched: tally.pages_fetched,
            fetch_failures: tally.fetch_failures,
            disallowed: tally.disallowed,
            relevant_pages: tally.relevant_pages,
            distinct_urls: self.frontier.total_count(),
            hosts_contacted: self.scheduler.hosts_contacted(),
            elapsed,
        }
    }
}

/// Fetches one page and feeds its links back into the frontier
///
/// Fetch failures are logged and reported; they are never retried.
async fn process_page(context: &TaskContext, scored: ScoredUrl) -> PageOutcome {
    let url = scored.url;

    let page = match context.fetcher.fetch(url.as_str(), &context.user_agent).await {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!("Fetch failed for {}: {}", url, e);
            return PageOutcome {
                url,
                fetched: false,
                relevant: false,
                links_added: 0,
            };
        }
    };

    let relevant = context.scorer.is_relevant(&page.text);
    if relevant {
        tracing::info!("Query found in page: {}", url);
    }

    let bonus = context.scorer.relevance_bonus(relevant);
    let links_added = enqueue_links(&context.frontier, &context.scorer, &page.links, bonus);
    tracing::debug!(
        "Processed {}: {} links, {} new",
        url,
        page.links.len(),
        links_added
    );

    PageOutcome {
        url,
        fetched: true,
        relevant,
        links_added,
    }
}

/// Canonicalizes, scores and queues raw links, returning how many were new
fn enqueue_links(frontier: &Frontier, scorer: &Scorer, links: &[String], bonus: f64) -> usize {
    let mut added = 0;

    for link in links {
        let Some(canonical) = canonicalize(link) else {
            tracing::trace!("Dropping link {}", link);
            continue;
        };

        let score = scorer.rate(&canonical, bonus);
        if frontier.add(canonical, score) {
            added += 1;
        }
    }

    added
}
