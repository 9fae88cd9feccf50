// Validation errors — the only way an analysis request can fail.
//
// Everything else (empty documents, zero vectors) is absorbed by the zero and
// empty conventions of the scoring stages.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("at least one text is required")]
    EmptyCorpus,

    #[error("too many texts: got {count}, at most {max} are allowed")]
    TooManyDocuments { count: usize, max: usize },

    #[error("text {index} is {chars} characters long, the limit is {max}")]
    TextTooLong { index: usize, chars: usize, max: usize },

    #[error("gap_base {index} is out of range for {count} texts")]
    BaseOutOfRange { index: i64, count: usize },

    #[error("{field} must not be negative (got {value})")]
    NegativeSize { field: &'static str, value: i64 },

    #[error("gap_min_delta must be a finite number")]
    NonFiniteThreshold,
}
