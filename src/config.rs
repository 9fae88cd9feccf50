use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::tokenizer::{StopwordSet, Tokenizer};
use crate::analysis::{AnalysisService, Limits};
use crate::rewrite::chat::ChatRewriter;
use crate::rewrite::{NoopRewriter, Rewriter};

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_DOCUMENTS: usize = 3;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 100_000;
pub const DEFAULT_REWRITE_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_REWRITE_MODEL: &str = "gpt-4o-mini";

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. The .env file is loaded at startup
/// via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the web server binds to
    pub bind: String,
    pub port: u16,
    /// Most texts accepted in one analysis request
    pub max_documents: usize,
    /// Longest single text accepted, in characters
    pub max_text_chars: usize,
    /// Stopword list used by the tokenizer
    pub stopwords: StopwordSet,
    /// API key for the rewrite provider. Empty disables rewriting.
    pub rewrite_api_key: String,
    pub rewrite_api_url: String,
    pub rewrite_model: String,
    /// Provider pacing (requests per second, 0 = unpaced)
    pub rewrite_requests_per_second: f64,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable or `None` when unset. Every variable has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("KEYGAP_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("KEYGAP_PORT must be a port number, got '{v}'"))?,
            None => DEFAULT_PORT,
        };

        let max_documents = match get("KEYGAP_MAX_DOCUMENTS") {
            Some(v) => v.trim().parse::<usize>().with_context(|| {
                format!("KEYGAP_MAX_DOCUMENTS must be a positive integer, got '{v}'")
            })?,
            None => DEFAULT_MAX_DOCUMENTS,
        };
        if max_documents == 0 {
            anyhow::bail!("KEYGAP_MAX_DOCUMENTS must be at least 1");
        }

        let max_text_chars = match get("KEYGAP_MAX_TEXT_CHARS") {
            Some(v) => v.trim().parse::<usize>().with_context(|| {
                format!("KEYGAP_MAX_TEXT_CHARS must be a positive integer, got '{v}'")
            })?,
            None => DEFAULT_MAX_TEXT_CHARS,
        };

        let stopwords = match get("KEYGAP_STOPWORDS") {
            Some(v) => v.parse::<StopwordSet>()?,
            None => StopwordSet::default(),
        };

        let rewrite_requests_per_second = match get("REWRITE_REQUESTS_PER_SECOND") {
            Some(v) => v.trim().parse::<f64>().with_context(|| {
                format!("REWRITE_REQUESTS_PER_SECOND must be a number, got '{v}'")
            })?,
            None => 1.0,
        };

        Ok(Self {
            bind: get("KEYGAP_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port,
            max_documents,
            max_text_chars,
            stopwords,
            rewrite_api_key: get("REWRITE_API_KEY").unwrap_or_default(),
            rewrite_api_url: get("REWRITE_API_URL")
                .unwrap_or_else(|| DEFAULT_REWRITE_API_URL.to_string()),
            rewrite_model: get("REWRITE_MODEL")
                .unwrap_or_else(|| DEFAULT_REWRITE_MODEL.to_string()),
            rewrite_requests_per_second,
        })
    }

    /// Check that a rewrite provider is configured.
    /// Call this before any operation that must actually rewrite text.
    pub fn require_rewrite(&self) -> Result<()> {
        if self.rewrite_api_key.is_empty() {
            anyhow::bail!(
                "REWRITE_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_documents: Some(self.max_documents),
            max_text_chars: Some(self.max_text_chars),
        }
    }

    /// The analysis service described by this configuration.
    pub fn analysis_service(&self) -> AnalysisService {
        AnalysisService::new(Tokenizer::new(self.stopwords), self.limits())
    }

    /// Create the rewrite provider, or a NoopRewriter when no key is set.
    pub fn create_rewriter(&self) -> Arc<dyn Rewriter> {
        if self.rewrite_api_key.is_empty() {
            info!("No REWRITE_API_KEY set, rewriting disabled");
            return Arc::new(NoopRewriter);
        }
        info!(model = %self.rewrite_model, "Using chat-completions rewrite provider");
        Arc::new(ChatRewriter::new(
            self.rewrite_api_url.clone(),
            self.rewrite_api_key.clone(),
            self.rewrite_model.clone(),
            self.rewrite_requests_per_second,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_documents, 3);
        assert_eq!(config.max_text_chars, DEFAULT_MAX_TEXT_CHARS);
        assert_eq!(config.stopwords, StopwordSet::Builtin);
        assert!(config.rewrite_api_key.is_empty());
        assert_eq!(config.rewrite_model, DEFAULT_REWRITE_MODEL);
        assert!(config.require_rewrite().is_err());
        assert!(!config.create_rewriter().is_configured());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("KEYGAP_PORT", "9000"),
            ("KEYGAP_BIND", "0.0.0.0"),
            ("KEYGAP_MAX_DOCUMENTS", "5"),
            ("KEYGAP_STOPWORDS", "none"),
            ("REWRITE_API_KEY", "sk-test"),
            ("REWRITE_REQUESTS_PER_SECOND", "2.5"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.max_documents, 5);
        assert_eq!(config.stopwords, StopwordSet::None);
        assert!(config.require_rewrite().is_ok());
        assert!(config.create_rewriter().is_configured());
        assert_eq!(config.limits().max_documents, Some(5));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("KEYGAP_PORT", "  "), ("REWRITE_MODEL", "")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.rewrite_model, DEFAULT_REWRITE_MODEL);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("KEYGAP_PORT", "eighty")]).is_err());
        assert!(config_from(&[("KEYGAP_MAX_DOCUMENTS", "0")]).is_err());
        assert!(config_from(&[("KEYGAP_STOPWORDS", "klingon")]).is_err());
    }

    #[test]
    fn test_tiny_request_rate_builds_rewriter() {
        let config = config_from(&[
            ("REWRITE_API_KEY", "sk-test"),
            ("REWRITE_REQUESTS_PER_SECOND", "1e-30"),
        ])
        .unwrap();
        assert!(config.create_rewriter().is_configured());
    }
}
