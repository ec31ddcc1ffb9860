use crate::scoring::terms::collapse_whitespace;
use crate::scoring::{QueryTerms, Transliteration};
use crate::url::CanonicalUrl;

/// Rates discovered links and judges page relevance
///
/// # Scoring
///
/// | Signal | Points |
/// |--------|--------|
/// | Link found on a relevant page | `relevance_multiplier * word_count` |
/// | Each distinct query word in the URL | 1 |
/// | Topic in the URL | `word_count` |
#[derive(Debug, Clone)]
pub struct Scorer {
    terms: QueryTerms,
    table: Transliteration,
    relevance_multiplier: f64,
}

impl Scorer {
    /// Creates a scorer for one crawl
    ///
    /// # Arguments
    ///
    /// * `terms` - Normalized topic and query terms
    /// * `table` - The table the terms were normalized with, reused for page text
    /// * `relevance_multiplier` - Bonus per query word for links on relevant pages
    pub fn new(terms: QueryTerms, table: Transliteration, relevance_multiplier: f64) -> Self {
        Self {
            terms,
            table,
            relevance_multiplier,
        }
    }

    /// The terms this scorer matches against
    pub fn terms(&self) -> &QueryTerms {
        &self.terms
    }

    /// Computes the priority score of a link
    ///
    /// # Arguments
    ///
    /// * `url` - The canonical link
    /// * `relevance_bonus` - Bonus inherited from the page the link was found on
    pub fn rate(&self, url: &CanonicalUrl, relevance_bonus: f64) -> f64 {
        let lower_url = url.as_str().to_lowercase();
        let mut score = relevance_bonus.max(0.0);

        for word in self.terms.words() {
            if lower_url.contains(word.as_str()) {
                score += 1.0;
            }
        }

        let topic = self.terms.topic();
        if !topic.is_empty() && lower_url.contains(topic) {
            score += self.terms.word_count() as f64;
        }

        score
    }

    /// Returns true if `text` contains the query phrase
    ///
    /// Matching is a case-insensitive literal substring search after the same
    /// whitespace collapsing and transliteration applied to the query.
    pub fn is_relevant(&self, text: &str) -> bool {
        let phrase = self.terms.phrase();
        if phrase.is_empty() {
            return false;
        }

        let normalized = self.table.apply(&collapse_whitespace(&text.to_lowercase()));
        normalized.contains(phrase)
    }

    /// The bonus passed to [`Scorer::rate`] for links found on a page
    pub fn relevance_bonus(&self, page_relevant: bool) -> f64 {
        if page_relevant {
            self.relevance_multiplier * self.terms.word_count() as f64
        } else {
            0.0
        }
    }
}
