//! The crawl frontier: every URL still waiting to be crawled
//!
//! The frontier is a priority queue of canonical URLs plus the set of every
//! URL it has ever accepted. A URL is accepted once per crawl; re-adding it,
//! even with a different score, does nothing.
//!
//! All state sits behind one internal lock, so callers never need their own
//! locking around `add` or `remove_next`, and the lock is never held across
//! an `.await`.

mod scored_url;

pub use scored_url::ScoredUrl;

use crate::url::CanonicalUrl;
use std::collections::{BinaryHeap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

/// Initial capacity of the pending queue and seen set
const INITIAL_CAPACITY: usize = 1000;

/// A deduplicated, priority-ordered queue of URLs to crawl
#[derive(Debug)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
    added: Notify,
}

#[derive(Debug)]
struct FrontierInner {
    /// Pending URLs, highest score first
    pending: BinaryHeap<ScoredUrl>,

    /// Every URL ever accepted
    seen: HashSet<CanonicalUrl>,

    /// Next insertion sequence number
    next_seq: u64,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(FrontierInner {
                pending: BinaryHeap::with_capacity(INITIAL_CAPACITY),
                seen: HashSet::with_capacity(INITIAL_CAPACITY),
                next_seq: 0,
            }),
            added: Notify::new(),
        }
    }

    /// Adds a URL unless it has been accepted before
    ///
    /// # Arguments
    ///
    /// * `url` - The canonical URL
    /// * `score` - Its priority; non-finite or negative scores count as 0
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now pending
    /// * `false` - The URL was already seen; nothing changed
    pub fn add(&self, url: CanonicalUrl, score: f64) -> bool {
        {
            let mut inner = self.lock();
            if inner.seen.contains(&url) {
                return false;
            }

            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.seen.insert(url.clone());
            inner.pending.push(ScoredUrl::new(url, score, seq));
        }

        self.added.notify_one();
        true
    }

    /// Removes and returns the highest-scored pending URL
    ///
    /// Returns `None` when nothing is pending. That is a transient condition
    /// while fetches are still in flight, not an error.
    pub fn remove_next(&self) -> Option<ScoredUrl> {
        self.lock().pending.pop()
    }

    /// Returns true if no URLs are pending right now
    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    /// Returns the number of pending URLs
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Returns the number of distinct URLs ever accepted
    pub fn total_count(&self) -> usize {
        self.lock().seen.len()
    }

    /// Returns true if `url` has ever been accepted
    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.lock().seen.contains(url)
    }

    /// Waits until a URL is pending or `max_wait` elapses
    ///
    /// # Returns
    ///
    /// * `true` - The frontier has pending URLs
    /// * `false` - The wait timed out with the frontier still empty
    pub async fn wait_non_empty(&self, max_wait: Duration) -> bool {
        // Register interest before checking so an add in between is not missed
        let notified = self.added.notified();
        if !self.is_empty() {
            return true;
        }

        let _ = tokio::time::timeout(max_wait, notified).await;
        !self.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        // The inner state is consistent after every statement, so a poisoned
        // lock still guards valid data
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::canonicalize;
    use std::sync::Arc;

    fn url(raw: &str) -> CanonicalUrl {
        canonicalize(raw).unwrap()
    }

    #[test]
    fn test_new_frontier_is_empty() {
        let frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert_eq!(frontier.len(), 0);
        assert_eq!(frontier.total_count(), 0);
        assert!(frontier.remove_next().is_none());
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let frontier = Frontier::new();

        assert!(frontier.add(url("http://example.com/a"), 1.0));
        assert!(!frontier.add(url("http://example.com/a"), 9.0));

        assert_eq!(frontier.total_count(), 1);
        let first = frontier.remove_next().unwrap();
        assert_eq!(first.url.as_str(), "http://example.com/a/");
        assert_eq!(first.score, 1.0);
        assert!(frontier.remove_next().is_none());
    }

    #[test]
    fn test_removed_url_is_never_readmitted() {
        let frontier = Frontier::new();
        frontier.add(url("http://example.com/a"), 1.0);
        frontier.remove_next().unwrap();

        assert!(!frontier.add(url("http://example.com/a"), 1.0));
        assert!(frontier.is_empty());
        assert!(frontier.contains(&url("http://example.com/a")));
    }

    #[test]
    fn test_removes_in_descending_score_order() {
        let frontier = Frontier::new();
        frontier.add(url("http://example.com/one"), 1.0);
        frontier.add(url("http://example.com/five"), 5.0);
        frontier.add(url("http://example.com/three"), 3.0);

        let scores: Vec<f64> = std::iter::from_fn(|| frontier.remove_next())
            .map(|s| s.score)
            .collect();
        assert_eq!(scores, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_equal_scores_follow_insertion_order() {
        let frontier = Frontier::new();
        frontier.add(url("http://example.com/b"), 2.0);
        frontier.add(url("http://example.com/a"), 2.0);
        frontier.add(url("http://example.com/c"), 2.0);

        let order: Vec<String> = std::iter::from_fn(|| frontier.remove_next())
            .map(|s| s.url.into_string())
            .collect();
        assert_eq!(
            order,
            vec![
                "http://example.com/b/",
                "http://example.com/a/",
                "http://example.com/c/"
            ]
        );
    }

    #[test]
    fn test_exhaustion() {
        let frontier = Frontier::new();
        frontier.add(url("http://example.com/a"), 0.0);
        frontier.add(url("http://example.com/b"), 0.0);

        assert!(frontier.remove_next().is_some());
        assert!(frontier.remove_next().is_some());
        assert!(frontier.is_empty());
        assert!(frontier.remove_next().is_none());
        assert_eq!(frontier.total_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_not_lost() {
        let frontier = Arc::new(Frontier::new());
        let mut handles = Vec::new();

        for task in 0..8 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                for i in 0..250 {
                    frontier.add(url(&format!("http://example.com/{}/{}", task, i)), i as f64);
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(frontier.total_count(), 2000);
        assert_eq!(frontier.len(), 2000);
    }

    #[tokio::test]
    async fn test_wait_non_empty_times_out() {
        let frontier = Frontier::new();
        assert!(!frontier.wait_non_empty(Duration::from_millis(20)).await);
    }

    #[tokio::test]
    async fn test_wait_non_empty_wakes_on_add() {
        let frontier = Arc::new(Frontier::new());
        let producer = Arc::clone(&frontier);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            producer.add(canonicalize("http://example.com/late").unwrap(), 1.0);
        });

        assert!(frontier.wait_non_empty(Duration::from_secs(5)).await);
        assert_eq!(frontier.remove_next().unwrap().score, 1.0);
    }
}
