// Corpus statistics — raw term counts per document and document frequencies.
//
// Nothing here is normalized. A document with no tokens gets an empty
// TermCounts and adds nothing to the document frequencies.

use std::collections::HashMap;

use super::tokenizer::Tokenizer;

/// One input document: its position in the request, its raw text and the
/// tokens derived from it. Immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    index: usize,
    text: String,
    tokens: Vec<String>,
}

impl Document {
    pub fn new(index: usize, text: impl Into<String>, tokenizer: &Tokenizer) -> Self {
        let text = text.into();
        let tokens = tokenizer.tokenize(&text);
        Self {
            index,
            text,
            tokens,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Occurrence counts for a single document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermCounts {
    counts: HashMap<String, usize>,
    total: usize,
}

impl TermCounts {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
        }
        Self {
            counts,
            total: tokens.len(),
        }
    }

    /// How many times `term` occurs (0 when absent).
    pub fn count(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Total number of tokens in the document, including repeats.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct terms.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }
}

/// Term counts for every document plus corpus-wide document frequencies.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    term_counts: Vec<TermCounts>,
    document_frequency: HashMap<String, usize>,
}

impl CorpusStats {
    /// Count terms across the tokenized documents, in input order.
    pub fn from_token_lists<T: AsRef<[String]>>(documents: &[T]) -> Self {
        let term_counts: Vec<TermCounts> = documents
            .iter()
            .map(|tokens| TermCounts::from_tokens(tokens.as_ref()))
            .collect();

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for tc in &term_counts {
            // Keys are unique within one document, so each term counts once
            for (term, _) in tc.iter() {
                *document_frequency.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            term_counts,
            document_frequency,
        }
    }

    pub fn from_documents(documents: &[Document]) -> Self {
        let lists: Vec<&[String]> = documents.iter().map(Document::tokens).collect();
        Self::from_token_lists(&lists)
    }

    /// Number of documents in the corpus, empty ones included.
    pub fn document_count(&self) -> usize {
        self.term_counts.len()
    }

    pub fn term_counts(&self) -> &[TermCounts] {
        &self.term_counts
    }

    /// Number of documents containing `term` at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms across the whole corpus.
    pub fn vocabulary_size(&self) -> usize {
        self.document_frequency.len()
    }
}
