// Keyword gap analysis — where the base document leans on a term harder than
// a competitor does.
//
// Candidates are only the base document's own top keywords, so a gap is
// always about a term that matters to the base. For each other document we
// compute base_score - other_score, keep deltas at or above the threshold,
// and rank them the same way top keywords are ranked.

use serde::Serialize;

use super::error::AnalysisError;
use super::tfidf::{rank_order, Keyword, TfIdfVector};

/// Knobs for one gap analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapParams {
    /// Size of the base document's candidate pool (its top-N keywords)
    pub top_n: usize,
    /// Maximum entries kept per comparison
    pub gap_top: usize,
    /// Smallest delta worth reporting
    pub min_delta: f64,
}

impl Default for GapParams {
    fn default() -> Self {
        Self {
            top_n: 15,
            gap_top: 10,
            min_delta: 0.05,
        }
    }
}

/// A term the base document emphasizes more than the comparison document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapEntry {
    pub term: String,
    #[serde(serialize_with = "super::models::round4")]
    pub delta: f64,
    /// Score in the base document
    #[serde(rename = "base", serialize_with = "super::models::round4")]
    pub base_score: f64,
    /// Score in the comparison document (0.0 when absent)
    #[serde(rename = "other", serialize_with = "super::models::round4")]
    pub other_score: f64,
}

/// Ranked gaps between the base and one other document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapComparison {
    /// Index of the comparison document
    pub vs: usize,
    pub items: Vec<GapEntry>,
}

/// All comparisons for one base document, in ascending document order.
#[derive(Debug, Clone, PartialEq)]
pub struct GapReport {
    pub base: usize,
    pub comparisons: Vec<GapComparison>,
}

/// Compare `vectors[base]` against every other vector.
///
/// Emits one comparison per other document, even when it has no entries.
pub fn analyze_gaps(
    base: usize,
    vectors: &[TfIdfVector],
    params: &GapParams,
) -> Result<GapReport, AnalysisError> {
    let base_vec = vectors.get(base).ok_or(AnalysisError::BaseOutOfRange {
        index: base as i64,
        count: vectors.len(),
    })?;

    let candidates = base_vec.top_keywords(params.top_n);

    let comparisons = vectors
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != base)
        .map(|(j, other)| GapComparison {
            vs: j,
            items: compare(&candidates, other, params),
        })
        .collect();

    Ok(GapReport { base, comparisons })
}

fn compare(candidates: &[Keyword], other: &TfIdfVector, params: &GapParams) -> Vec<GapEntry> {
    if params.gap_top == 0 {
        return Vec::new();
    }

    let mut entries: Vec<GapEntry> = candidates
        .iter()
        .filter_map(|keyword| {
            let base_score = keyword.score;
            let other_score = other.get(&keyword.term);
            let delta = base_score - other_score;
            // Gap entries always have a strictly positive delta
            (delta > 0.0 && delta >= params.min_delta).then(|| GapEntry {
                term: keyword.term.clone(),
                delta,
                base_score,
                other_score,
            })
        })
        .collect();

    entries.sort_by(|a, b| rank_order(a.delta, &a.term, b.delta, &b.term));
    entries.truncate(params.gap_top);
    entries
}
