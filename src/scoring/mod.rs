//! Link scoring for best-first exploration
//!
//! The scorer turns a topic and a query phrase into a priority for each
//! discovered link. Scores only bias the crawl order; they say nothing
//! definitive about relevance.
//!
//! # Components
//!
//! - `Transliteration`: an injected character substitution table applied to
//!   the topic, the query and page text before matching
//! - `QueryTerms`: the normalized topic, phrase and distinct query words
//! - `Scorer`: rates canonical URLs and decides whether page text is relevant

mod scorer;
mod terms;
mod transliteration;

pub use scorer::Scorer;
pub use terms::QueryTerms;
pub use transliteration::Transliteration;
