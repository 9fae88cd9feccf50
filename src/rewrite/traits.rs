// Rewriter trait — the swap-ready abstraction over a text generation provider.
//
// The analysis engine never calls a rewriter. Callers hold an AnalysisReport,
// pick a document, and pass its keywords into a RewriteRequest explicitly.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisReport;

/// Optional shaping instructions for a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewriteConstraints {
    /// Approximate maximum length of the rewritten text, in words
    #[serde(default)]
    pub word_limit: Option<u32>,
    /// Desired tone, e.g. "friendly" or "authoritative"
    #[serde(default)]
    pub tone: Option<String>,
    /// Who the text is written for
    #[serde(default)]
    pub audience: Option<String>,
}

/// Body of `POST /api/rewrite`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub constraints: RewriteConstraints,
}

impl RewriteRequest {
    /// Build a request for document `document` of a previous analysis,
    /// reusing the keywords that analysis already ranked.
    ///
    /// Returns `None` if the document index is not part of the report.
    pub fn from_report(
        report: &AnalysisReport,
        document: usize,
        text: impl Into<String>,
        constraints: RewriteConstraints,
    ) -> Option<Self> {
        let keywords = report.keywords_for(document)?;
        Some(Self {
            text: text.into(),
            keywords,
            constraints,
        })
    }
}

/// Placeholder used when no rewrite provider is configured.
/// Always fails, so callers never mistake an unconfigured setup for output.
pub struct NoopRewriter;

#[async_trait]
impl Rewriter for NoopRewriter {
    async fn rewrite(
        &self,
        _text: &str,
        _keywords: &[String],
        _constraints: &RewriteConstraints,
    ) -> Result<String> {
        anyhow::bail!("No rewrite provider configured. Set REWRITE_API_KEY to enable rewriting.")
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Trait for rewriting text around a keyword list. Async because real
/// providers are remote HTTP APIs.
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Rewrite `text` so it works in `keywords`, honoring `constraints`.
    async fn rewrite(
        &self,
        text: &str,
        keywords: &[String],
        constraints: &RewriteConstraints,
    ) -> Result<String>;

    /// Whether this rewriter can actually produce output.
    fn is_configured(&self) -> bool {
        true
    }

    /// Convenience wrapper for a full request.
    async fn rewrite_request(&self, request: &RewriteRequest) -> Result<String> {
        self.rewrite(&request.text, &request.keywords, &request.constraints)
            .await
    }
}
