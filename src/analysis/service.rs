// AnalysisService — runs the whole pipeline for one request.
//
//   texts -> tokens -> corpus stats -> TF-IDF vectors -> {similarity, gaps}
//
// The service only holds immutable configuration (tokenizer and limits), so a
// single instance can be shared across concurrent requests behind an Arc.

use rayon::prelude::*;
use tracing::debug;

use super::corpus::{CorpusStats, Document};
use super::error::AnalysisError;
use super::gaps::analyze_gaps;
use super::models::{AnalysisParams, AnalysisReport, AnalyzeRequest, Limits};
use super::similarity::SimilarityMatrix;
use super::tfidf::score_corpus;
use super::tokenizer::Tokenizer;

#[derive(Debug, Clone, Default)]
pub struct AnalysisService {
    tokenizer: Tokenizer,
    limits: Limits,
}

impl AnalysisService {
    pub fn new(tokenizer: Tokenizer, limits: Limits) -> Self {
        Self { tokenizer, limits }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Validate `request` and analyze it. Validation failures stop the
    /// pipeline before any work is done.
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, AnalysisError> {
        let params = request.validate(&self.limits)?;
        self.run(&request.texts, &params)
    }

    /// Analyze already-validated input.
    pub fn run<S>(&self, texts: &[S], params: &AnalysisParams) -> Result<AnalysisReport, AnalysisError>
    where
        S: AsRef<str> + Sync,
    {
        let documents: Vec<Document> = texts
            .par_iter()
            .enumerate()
            .map(|(i, text)| Document::new(i, text.as_ref(), &self.tokenizer))
            .collect();

        let stats = CorpusStats::from_documents(&documents);
        let vectors = score_corpus(&stats);

        let top_keywords = vectors
            .iter()
            .map(|v| v.top_keywords(params.top_n()))
            .collect();
        let similarity = SimilarityMatrix::compute(&vectors);
        let gaps = analyze_gaps(params.gap_base, &vectors, &params.gaps)?;

        debug!(
            documents = documents.len(),
            vocab_size = stats.vocabulary_size(),
            gap_base = params.gap_base,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            top_keywords,
            similarity,
            gaps: gaps.comparisons,
            vocab_size: stats.vocabulary_size(),
            gap_base: params.gap_base,
        })
    }
}
