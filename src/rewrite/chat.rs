// Chat-completions rewrite provider.
//
// Talks to any OpenAI-compatible `/v1/chat/completions` endpoint. The prompt
// asks the model to rewrite the text so it naturally covers the supplied
// keywords, within the optional word limit, tone and audience.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::{RewriteConstraints, Rewriter};
use crate::output::truncate_chars;

const SYSTEM_PROMPT: &str = "You are an editor who rewrites web copy for search visibility. \
Keep the original meaning and facts. Work the requested keywords in naturally; never stuff them. \
Reply with the rewritten text only.";

/// Rewriter backed by an OpenAI-compatible chat-completions API.
pub struct ChatRewriter {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    rate_limiter: RateLimiter,
}

impl ChatRewriter {
    pub fn new(api_url: String, api_key: String, model: String, requests_per_second: f64) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            model,
            rate_limiter: RateLimiter::new(requests_per_second),
        }
    }
}

#[async_trait]
impl Rewriter for ChatRewriter {
    async fn rewrite(
        &self,
        text: &str,
        keywords: &[String],
        constraints: &RewriteConstraints,
    ) -> Result<String> {
        if text.trim().is_empty() {
            anyhow::bail!("Nothing to rewrite: the text is empty");
        }

        self.rate_limiter.acquire().await;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(text, keywords, constraints),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call rewrite provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Rewrite provider returned {}: {}",
                status,
                truncate_chars(&body, 300)
            );
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse rewrite provider response")?;

        let result = extract_content(parsed)?;

        debug!(
            model = %self.model,
            keywords = keywords.len(),
            input_chars = text.chars().count(),
            output_chars = result.chars().count(),
            "Rewrote text"
        );

        Ok(result)
    }
}

/// Build the user prompt for one rewrite.
pub fn build_prompt(text: &str, keywords: &[String], constraints: &RewriteConstraints) -> String {
    let mut prompt = String::from("Rewrite the following text.\n");

    if !keywords.is_empty() {
        prompt.push_str(&format!(
            "Make sure it covers these keywords: {}.\n",
            keywords.join(", ")
        ));
    }
    if let Some(limit) = constraints.word_limit {
        prompt.push_str(&format!("Keep it under {limit} words.\n"));
    }
    if let Some(tone) = constraints.tone.as_deref().filter(|t| !t.trim().is_empty()) {
        prompt.push_str(&format!("Use a {} tone.\n", tone.trim()));
    }
    if let Some(audience) = constraints
        .audience
        .as_deref()
        .filter(|a| !a.trim().is_empty())
    {
        prompt.push_str(&format!("Write for this audience: {}.\n", audience.trim()));
    }

    prompt.push_str("\nText:\n");
    prompt.push_str(text);
    prompt
}

fn extract_content(response: ChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .unwrap_or_default();
    let trimmed = content.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Rewrite provider returned an empty completion");
    }
    Ok(trimmed.to_string())
}

// --- Chat-completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_keywords_and_constraints() {
        let constraints = RewriteConstraints {
            word_limit: Some(150),
            tone: Some("friendly".to_string()),
            audience: Some("warehouse managers".to_string()),
        };
        let prompt = build_prompt(
            "Original copy.",
            &["fire".to_string(), "safety".to_string()],
            &constraints,
        );
        assert!(prompt.contains("fire, safety"));
        assert!(prompt.contains("under 150 words"));
        assert!(prompt.contains("friendly tone"));
        assert!(prompt.contains("warehouse managers"));
        assert!(prompt.ends_with("Original copy."));
    }

    #[test]
    fn test_prompt_skips_missing_constraints() {
        let prompt = build_prompt("Body", &[], &RewriteConstraints::default());
        assert!(!prompt.contains("keywords"));
        assert!(!prompt.contains("words."));
        assert!(!prompt.contains("tone"));
        assert!(!prompt.contains("audience"));
    }

    #[test]
    fn test_extract_content() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  New text  "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(parsed).unwrap(), "New text");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_content(empty).is_err());
    }

    #[tokio::test]
    async fn test_empty_text_rejected_before_network() {
        let rewriter = ChatRewriter::new(
            "http://127.0.0.1:9/unused".to_string(),
            "key".to_string(),
            "model".to_string(),
            0.0,
        );
        let err = rewriter
            .rewrite("   ", &[], &RewriteConstraints::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
