use crate::scoring::Transliteration;

/// Normalized topic and query terms for one crawl
///
/// Terms are case-folded, whitespace-collapsed and transliterated once, when
/// the crawl starts, so scoring never repeats the preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTerms {
    original_topic: String,
    original_phrase: String,
    topic: String,
    phrase: String,
    words: Vec<String>,
}

impl QueryTerms {
    /// Normalizes a topic and query phrase with the given table
    ///
    /// # Arguments
    ///
    /// * `topic` - The topic term used to steer towards relevant links
    /// * `query` - The phrase searched for in page text
    /// * `table` - Substitution table applied after lowercasing
    pub fn new(topic: &str, query: &str, table: &Transliteration) -> Self {
        let original_topic = collapse_whitespace(&topic.to_lowercase());
        let original_phrase = collapse_whitespace(&query.to_lowercase());

        let topic = table.apply(&original_topic);
        let phrase = table.apply(&original_phrase);

        let mut words: Vec<String> = Vec::new();
        for word in phrase.split(' ').filter(|w| !w.is_empty()) {
            if !words.iter().any(|w| w == word) {
                words.push(word.to_string());
            }
        }

        Self {
            original_topic,
            original_phrase,
            topic,
            phrase,
            words,
        }
    }

    /// The normalized topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The normalized query phrase
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Distinct query words, in first-occurrence order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of distinct query words
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The topic as given, lowercased but not transliterated
    pub fn original_topic(&self) -> &str {
        &self.original_topic
    }

    /// The phrase as given, lowercased but not transliterated
    pub fn original_phrase(&self) -> &str {
        &self.original_phrase
    }

    /// Returns true if transliteration changed the topic or the phrase
    pub fn is_transliterated(&self) -> bool {
        self.topic != self.original_topic || self.phrase != self.original_phrase
    }
}

/// Collapses runs of whitespace to single spaces
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
