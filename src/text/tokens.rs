use crate::text::stopwords::DEFAULT_STOPWORDS;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// A token starts and ends with a letter, may contain interior apostrophes,
/// and is therefore at least two characters long ("don't", "it's", "page")
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z][A-Za-z']*[A-Za-z]\b").expect("hardcoded regex pattern is valid"));

/// Turns extracted page text into a filtered lowercase token sequence
///
/// Output order matches first occurrence in the text; fingerprinting
/// depends on that ordering being reproducible.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Creates a tokenizer with the built-in English stop-word list
    pub fn new() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Creates a tokenizer with a custom stop-word list
    ///
    /// Words are case-folded; an empty list disables stop-word filtering.
    pub fn with_stopwords(words: &[String]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Tokenizes text into lowercase alphabetic tokens with stop words removed
    ///
    /// Empty or whitespace-only input yields an empty sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        TOKEN
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|token| !self.stopwords.contains(token))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
