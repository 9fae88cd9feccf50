// Tokenizer — turns raw text into the terms every other stage counts.
//
// Rules, in order: lowercase the whole text, split on runs of characters that
// are not alphanumeric, drop anything shorter than two characters, then drop
// stopwords. The same input always produces the same token sequence.

use std::collections::HashSet;
use std::str::FromStr;

use stop_words::{get, LANGUAGE};

/// Shortest token (in characters) that survives normalization.
pub const MIN_TERM_CHARS: usize = 2;

/// English function words filtered out by default.
pub const BUILTIN_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "with", "you", "your", "yours", "yourself", "yourselves",
];

/// Which stopword list the tokenizer filters against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopwordSet {
    /// The short built-in function-word list (default)
    #[default]
    Builtin,
    /// The much larger English list shipped by the `stop-words` crate
    Extended,
    /// Keep every token
    None,
}

impl FromStr for StopwordSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "builtin" | "" => Ok(StopwordSet::Builtin),
            "extended" => Ok(StopwordSet::Extended),
            "none" | "off" => Ok(StopwordSet::None),
            other => anyhow::bail!(
                "Unknown stopword set '{other}' (expected builtin, extended or none)"
            ),
        }
    }
}

/// Lowercasing, punctuation-splitting tokenizer with a fixed stopword list.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(StopwordSet::Builtin)
    }
}

impl Tokenizer {
    pub fn new(set: StopwordSet) -> Self {
        let stopwords = match set {
            StopwordSet::Builtin => BUILTIN_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            StopwordSet::Extended => get(LANGUAGE::English)
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            StopwordSet::None => HashSet::new(),
        };
        Self { stopwords }
    }

    /// Build a tokenizer from an explicit stopword list.
    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_stopword(&self, term: &str) -> bool {
        self.stopwords.contains(term)
    }

    /// Normalize `text` into an ordered sequence of terms.
    ///
    /// Empty or whitespace-only input yields an empty sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|tok| tok.chars().count() >= MIN_TERM_CHARS)
            .filter(|tok| !self.stopwords.contains(*tok))
            .map(str::to_string)
            .collect()
    }
}
