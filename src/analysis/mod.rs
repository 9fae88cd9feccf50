// Analysis engine — tokenizing, TF-IDF scoring, similarity and keyword gaps.

pub mod corpus;
pub mod error;
pub mod gaps;
pub mod models;
pub mod service;
pub mod similarity;
pub mod tfidf;
pub mod tokenizer;

pub use error::AnalysisError;
pub use models::{AnalysisParams, AnalysisReport, AnalyzeRequest, Limits};
pub use service::AnalysisService;
