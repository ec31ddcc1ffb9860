use crate::ConfigError;
use std::collections::BTreeMap;

/// Default substitution pairs, mapping Icelandic letters to plain ASCII
const ICELANDIC_PAIRS: &[(char, &str)] = &[
    ('á', "a"),
    ('ð', "d"),
    ('é', "e"),
    ('í', "i"),
    ('ó', "o"),
    ('ú', "u"),
    ('ý', "y"),
    ('þ', "th"),
    ('æ', "ae"),
    ('ö', "o"),
];

/// A character substitution table
///
/// Each crawl owns its own table, so crawls configured for different
/// alphabets can run side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transliteration {
    table: BTreeMap<char, String>,
}

impl Transliteration {
    /// Creates a table from character/replacement pairs
    pub fn new(pairs: impl IntoIterator<Item = (char, String)>) -> Self {
        Self {
            table: pairs.into_iter().collect(),
        }
    }

    /// Creates a table that leaves text unchanged
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates the Icelandic-to-ASCII table
    pub fn icelandic() -> Self {
        Self::new(
            ICELANDIC_PAIRS
                .iter()
                .map(|(from, to)| (*from, (*to).to_string())),
        )
    }

    /// Builds a table from configuration entries
    ///
    /// # Returns
    ///
    /// * `Ok(Transliteration)` - Every key was a single character
    /// * `Err(ConfigError)` - A key was empty or longer than one character
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut table = BTreeMap::new();

        for (key, replacement) in entries {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    table.insert(c, replacement.clone());
                }
                _ => {
                    return Err(ConfigError::Validation(format!(
                        "transliteration keys must be a single character, got '{}'",
                        key
                    )))
                }
            }
        }

        Ok(Self { table })
    }

    /// Returns true if the table has no substitutions
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Applies the table to every character of `text`
    pub fn apply(&self, text: &str) -> String {
        if self.table.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match self.table.get(&c) {
                Some(replacement) => out.push_str(replacement),
                None => out.push(c),
            }
        }
        out
    }
}
