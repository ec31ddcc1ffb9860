//! Dispatch scheduling and rate limiting
//!
//! This module handles:
//! - Global concurrency limiting via semaphores
//! - The global politeness interval between two dispatches
//! - An optional per-host interval and per-host request counting

use crate::config::CrawlerConfig;
use crate::state::HostState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Scheduler gates when the next fetch may be dispatched
///
/// The scheduler coordinates:
/// - Global concurrency limits (max fetches in flight)
/// - A minimum interval between any two dispatches
/// - A minimum interval between two dispatches to the same host, if configured
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Configured number of fetch slots
    max_slots: usize,

    /// Per-host state tracking
    host_states: HashMap<String, HostState>,

    politeness_delay: Duration,
    per_host_delay: Option<Duration>,

    /// When the last fetch was dispatched, to any host
    last_dispatch: Option<Instant>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        let max_slots = config.max_concurrent_fetches as usize;

        Self {
            global_semaphore: Arc::new(Semaphore::new(max_slots)),
            max_slots,
            host_states: HashMap::new(),
            politeness_delay: config.politeness_delay(),
            per_host_delay: config.per_host_delay(),
            last_dispatch: None,
        }
    }

    /// Waits for a free fetch slot
    ///
    /// The permit is held by the fetch task and released when it is dropped.
    /// Returns None only if the semaphore has been closed.
    pub async fn acquire_slot(&self) -> Option<OwnedSemaphorePermit> {
        self.global_semaphore.clone().acquire_owned().await.ok()
    }

    /// Returns how long a dispatch to `host` has to wait at `now`
    pub fn time_until_dispatch(&self, host: &str, now: Instant) -> Duration {
        let global_wait = self
            .last_dispatch
            .map(|last| {
                self.politeness_delay
                    .saturating_sub(now.saturating_duration_since(last))
            })
            .unwrap_or(Duration::ZERO);

        let host_wait = self
            .per_host_delay
            .and_then(|delay| {
                self.host_states
                    .get(host)
                    .and_then(|state| state.time_until_next_request(delay, now))
            })
            .unwrap_or(Duration::ZERO);

        global_wait.max(host_wait)
    }

    /// Sleeps until a dispatch to `host` is allowed, then records it
    pub async fn wait_for_turn(&mut self, host: &str) {
        let wait = self.time_until_dispatch(host, Instant::now());

        if !wait.is_zero() {
            tracing::trace!("Waiting {:?} before dispatching to {}", wait, host);
            tokio::time::sleep(wait).await;
        }

        self.record_dispatch(host, Instant::now());
    }

    /// Records that a fetch to `host` was dispatched at `now`
    pub fn record_dispatch(&mut self, host: &str, now: Instant) {
        self.last_dispatch = Some(now);
        self.host_states
            .entry(host.to_string())
            .or_insert_with(HostState::new)
            .record_request(now);
    }

    /// Returns the number of fetch slots currently in use
    pub fn in_flight(&self) -> usize {
        self.max_slots - self.global_semaphore.available_permits()
    }

    /// Gets the state for a specific host
    pub fn host_state(&self, host: &str) -> Option<&HostState> {
        self.host_states.get(host)
    }

    /// Returns the number of distinct hosts dispatched to so far
    pub fn hosts_contacted(&self) -> usize {
        self.host_states.len()
    }
}
