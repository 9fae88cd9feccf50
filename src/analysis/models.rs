// Request and response types for one analysis call.
//
// AnalyzeRequest mirrors the JSON body the browser sends (signed integers so
// negative values can be rejected instead of failing deserialization).
// AnalysisReport is the JSON body sent back. Reals are rounded to four
// decimals on the way out; ranking and thresholds use the unrounded values.

use serde::{Deserialize, Serialize, Serializer};

use super::error::AnalysisError;
use super::gaps::{GapComparison, GapParams};
use super::similarity::SimilarityMatrix;
use super::tfidf::Keyword;

pub const DEFAULT_TOP_N: i64 = 15;
pub const DEFAULT_GAP_BASE: i64 = 0;
pub const DEFAULT_GAP_TOP: i64 = 10;
pub const DEFAULT_GAP_MIN_DELTA: f64 = 0.05;

fn default_top_n() -> i64 {
    DEFAULT_TOP_N
}

fn default_gap_top() -> i64 {
    DEFAULT_GAP_TOP
}

fn default_gap_min_delta() -> f64 {
    DEFAULT_GAP_MIN_DELTA
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// serde helper: serialize a real rounded to four decimals.
pub fn round4<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 4))
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default = "default_top_n")]
    pub top_n: i64,
    #[serde(default)]
    pub gap_base: i64,
    #[serde(default = "default_gap_top")]
    pub gap_top: i64,
    #[serde(default = "default_gap_min_delta")]
    pub gap_min_delta: f64,
}

impl AnalyzeRequest {
    /// A request over `texts` with every other field at its default.
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            top_n: DEFAULT_TOP_N,
            gap_base: DEFAULT_GAP_BASE,
            gap_top: DEFAULT_GAP_TOP,
            gap_min_delta: DEFAULT_GAP_MIN_DELTA,
        }
    }

    /// Check the request against `limits` and convert it into engine params.
    pub fn validate(&self, limits: &Limits) -> Result<AnalysisParams, AnalysisError> {
        let count = self.texts.len();
        if count == 0 {
            return Err(AnalysisError::EmptyCorpus);
        }
        if let Some(max) = limits.max_documents {
            if count > max {
                return Err(AnalysisError::TooManyDocuments { count, max });
            }
        }
        if let Some(max) = limits.max_text_chars {
            for (index, text) in self.texts.iter().enumerate() {
                let chars = text.chars().count();
                if chars > max {
                    return Err(AnalysisError::TextTooLong { index, chars, max });
                }
            }
        }

        let top_n = non_negative("top_n", self.top_n)?;
        let gap_top = non_negative("gap_top", self.gap_top)?;

        if self.gap_base < 0 || self.gap_base as u64 >= count as u64 {
            return Err(AnalysisError::BaseOutOfRange {
                index: self.gap_base,
                count,
            });
        }

        if !self.gap_min_delta.is_finite() {
            return Err(AnalysisError::NonFiniteThreshold);
        }

        Ok(AnalysisParams {
            gap_base: self.gap_base as usize,
            gaps: GapParams {
                top_n,
                gap_top,
                min_delta: self.gap_min_delta,
            },
        })
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, AnalysisError> {
    usize::try_from(value).map_err(|_| AnalysisError::NegativeSize { field, value })
}

/// Request-size limits applied during validation. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limits {
    pub max_documents: Option<usize>,
    pub max_text_chars: Option<usize>,
}

/// Validated, engine-ready parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    pub gap_base: usize,
    pub gaps: GapParams,
}

impl AnalysisParams {
    /// Number of top keywords per document (also the gap candidate pool).
    pub fn top_n(&self) -> usize {
        self.gaps.top_n
    }
}

/// Body of the analysis response.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// One ranked keyword list per document, in input order
    pub top_keywords: Vec<Vec<Keyword>>,
    pub similarity: SimilarityMatrix,
    /// One comparison per non-base document, ascending by index
    pub gaps: Vec<GapComparison>,
    /// Distinct terms across the whole corpus
    pub vocab_size: usize,
    /// Which document the gaps were computed against
    #[serde(skip)]
    pub gap_base: usize,
}

impl AnalysisReport {
    pub fn document_count(&self) -> usize {
        self.top_keywords.len()
    }

    /// The already-ranked keyword terms for one document, ready to hand to a
    /// rewrite request. `None` if `document` is out of range.
    pub fn keywords_for(&self, document: usize) -> Option<Vec<String>> {
        self.top_keywords
            .get(document)
            .map(|list| list.iter().map(|k| k.term.clone()).collect())
    }
}
