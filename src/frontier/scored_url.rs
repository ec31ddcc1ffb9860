use crate::url::CanonicalUrl;
use std::cmp::Ordering;

/// A canonical URL waiting in the frontier with its priority
#[derive(Debug, Clone)]
pub struct ScoredUrl {
    /// The URL to fetch
    pub url: CanonicalUrl,

    /// Priority score (higher is fetched first)
    pub score: f64,

    /// Host of the URL, used for politeness grouping
    pub host: String,

    /// Insertion sequence number, breaks score ties in arrival order
    pub(crate) seq: u64,
}

impl ScoredUrl {
    pub(crate) fn new(url: CanonicalUrl, score: f64, seq: u64) -> Self {
        let host = url.host().to_string();
        Self {
            url,
            score: sanitize_score(score),
            host,
            seq,
        }
    }
}

/// Scores are finite and non-negative
fn sanitize_score(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}

// Higher scores are greater (popped first from BinaryHeap); among equal
// scores the earlier insertion is greater
impl Ord for ScoredUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScoredUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScoredUrl {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredUrl {}
