// TF-IDF scoring and top-keyword extraction.
//
// Smoothed formula:
//
//   tf(t, d)  = count(t, d) / max(1, total_tokens(d))
//   idf(t)    = ln(N / (1 + df(t))) + 1
//   tfidf     = tf * idf
//
// N / (1 + df) is at least N / (N + 1) >= 1/2, so ln(...) + 1 stays above zero
// and every score is positive and finite. Empty documents give empty vectors.

use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;

use super::corpus::{CorpusStats, TermCounts};

/// A ranked keyword: a term and its TF-IDF score in one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub term: String,
    #[serde(serialize_with = "super::models::round4")]
    pub score: f64,
}

/// Per-document TF-IDF scores. Terms absent from the document have no entry
/// and read back as 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfIdfVector {
    scores: HashMap<String, f64>,
}

impl TfIdfVector {
    pub fn from_scores(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    /// Score for `term`, or 0.0 when the document does not contain it.
    pub fn get(&self, term: &str) -> f64 {
        self.scores.get(term).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(t, s)| (t.as_str(), *s))
    }

    /// Euclidean length of the vector.
    pub fn norm(&self) -> f64 {
        self.scores.values().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// True when at least one entry is non-zero.
    pub fn has_signal(&self) -> bool {
        self.scores.values().any(|v| *v != 0.0)
    }

    /// The `count` highest-scoring terms, highest first.
    ///
    /// Equal scores are ordered by ascending term so the output never depends
    /// on hash map iteration order. A count of 0 yields an empty list.
    pub fn top_keywords(&self, count: usize) -> Vec<Keyword> {
        if count == 0 {
            return Vec::new();
        }
        let mut ranked: Vec<Keyword> = self
            .scores
            .iter()
            .map(|(term, score)| Keyword {
                term: term.clone(),
                score: *score,
            })
            .collect();
        ranked.sort_by(|a, b| rank_order(a.score, &a.term, b.score, &b.term));
        ranked.truncate(count);
        ranked
    }
}

/// Descending by value, then ascending by term.
pub(crate) fn rank_order(a_value: f64, a_term: &str, b_value: f64, b_term: &str) -> Ordering {
    b_value
        .total_cmp(&a_value)
        .then_with(|| a_term.cmp(b_term))
}

/// Smoothed inverse document frequency.
pub fn idf(document_frequency: usize, document_count: usize) -> f64 {
    (document_count as f64 / (1.0 + document_frequency as f64)).ln() + 1.0
}

/// Length-normalized term frequency.
pub fn tf(count: usize, total_tokens: usize) -> f64 {
    count as f64 / total_tokens.max(1) as f64
}

/// Score one document against the corpus it belongs to.
pub fn score_document(counts: &TermCounts, stats: &CorpusStats) -> TfIdfVector {
    let n = stats.document_count();
    let total = counts.total();
    let scores = counts
        .iter()
        .map(|(term, count)| {
            let score = tf(count, total) * idf(stats.document_frequency(term), n);
            (term.to_string(), score)
        })
        .collect();
    TfIdfVector { scores }
}

/// Score every document in the corpus. Documents are scored in parallel; the
/// result follows input order.
pub fn score_corpus(stats: &CorpusStats) -> Vec<TfIdfVector> {
    stats
        .term_counts()
        .par_iter()
        .map(|counts| score_document(counts, stats))
        .collect()
}
