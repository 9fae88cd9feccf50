// HTTP-level tests for the JSON API.
//
// Requests go straight through the Router with tower's oneshot, so no socket
// is opened. Rewrite providers are in-memory mocks.

#![cfg(feature = "web")]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use keygap::config::Config;
use keygap::rewrite::{RewriteConstraints, Rewriter};
use keygap::web::{build_router, AppState};

struct EchoRewriter;

#[async_trait]
impl Rewriter for EchoRewriter {
    async fn rewrite(
        &self,
        text: &str,
        keywords: &[String],
        constraints: &RewriteConstraints,
    ) -> Result<String> {
        let limit = constraints
            .word_limit
            .map(|n| n.to_string())
            .unwrap_or_default();
        Ok(format!("{text}|{}|{limit}", keywords.join(",")))
    }
}

struct FailingRewriter;

#[async_trait]
impl Rewriter for FailingRewriter {
    async fn rewrite(
        &self,
        _text: &str,
        _keywords: &[String],
        _constraints: &RewriteConstraints,
    ) -> Result<String> {
        anyhow::bail!("provider returned 500")
    }
}

fn app_with(rewriter: Option<Arc<dyn Rewriter>>) -> Router {
    let mut state = AppState::from_config(Config::from_lookup(|_| None).unwrap());
    if let Some(rewriter) = rewriter {
        state.rewriter = rewriter;
    }
    build_router(state)
}

async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ============================================================
// /health
// ============================================================

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(app_with(None), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ============================================================
// /api/analyze
// ============================================================

#[tokio::test]
async fn analyze_returns_full_report() {
    let body = r#"{
        "texts": [
            "fire safety training for warehouse staff",
            "warehouse safety training programs",
            "office ergonomics guide"
        ],
        "top_n": 2
    }"#;
    let (status, json) = send(app_with(None), "POST", "/api/analyze", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["top_keywords"].as_array().unwrap().len(), 3);
    assert_eq!(json["top_keywords"][0][0]["term"], "fire");
    assert_eq!(json["top_keywords"][0][1]["term"], "staff");
    assert_eq!(json["similarity"][1][1], 1.0);
    assert_eq!(json["similarity"][0][2], 0.0);
    assert_eq!(json["gaps"][0]["vs"], 1);
    assert_eq!(json["gaps"][1]["vs"], 2);
    assert_eq!(json["vocab_size"], 9);
}

#[tokio::test]
async fn analyze_blank_texts() {
    let (status, json) = send(
        app_with(None),
        "POST",
        "/api/analyze",
        Some(r#"{"texts": ["", "", ""]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["similarity"],
        serde_json::json!([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]])
    );
    assert_eq!(json["gaps"][0]["items"], serde_json::json!([]));
    assert_eq!(json["gaps"][1]["items"], serde_json::json!([]));
}

#[tokio::test]
async fn analyze_rejects_out_of_range_base() {
    let (status, json) = send(
        app_with(None),
        "POST",
        "/api/analyze",
        Some(r#"{"texts": ["one text", "two text"], "gap_base": 5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("gap_base"));
    assert!(json.get("top_keywords").is_none());
}

#[tokio::test]
async fn analyze_rejects_too_many_texts() {
    let (status, json) = send(
        app_with(None),
        "POST",
        "/api/analyze",
        Some(r#"{"texts": ["a", "b", "c", "d"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn analyze_rejects_non_list_texts() {
    let (status, json) = send(
        app_with(None),
        "POST",
        "/api/analyze",
        Some(r#"{"texts": "not a list"}"#),
    )
    .await;

    assert!(status.is_client_error());
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn analyze_rejects_empty_texts() {
    let (status, _) = send(app_with(None), "POST", "/api/analyze", Some(r#"{"texts": []}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================
// /api/rewrite
// ============================================================

#[tokio::test]
async fn rewrite_unconfigured_is_unavailable() {
    let (status, json) = send(
        app_with(None),
        "POST",
        "/api/rewrite",
        Some(r#"{"text": "hello", "keywords": ["fire"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn rewrite_passes_keywords_and_constraints() {
    let (status, json) = send(
        app_with(Some(Arc::new(EchoRewriter))),
        "POST",
        "/api/rewrite",
        Some(r#"{"text": "hello", "keywords": ["fire", "staff"], "word_limit": 40}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], "hello|fire,staff|40");
}

#[tokio::test]
async fn rewrite_rejects_empty_text() {
    let (status, _) = send(
        app_with(Some(Arc::new(EchoRewriter))),
        "POST",
        "/api/rewrite",
        Some(r#"{"text": "   "}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn rewrite_provider_failure_is_bad_gateway() {
    let (status, json) = send(
        app_with(Some(Arc::new(FailingRewriter))),
        "POST",
        "/api/rewrite",
        Some(r#"{"text": "hello"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("provider returned 500"));
}
