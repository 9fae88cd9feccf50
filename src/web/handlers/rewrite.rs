// POST /api/rewrite — forward a text and its keywords to the rewrite provider.
//
// The browser passes the keywords it got back from /api/analyze; nothing from
// earlier requests is kept on the server.
//
// 200 {"result": ...} on success, 503 when no provider is configured,
// 502 when the provider call fails.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use crate::rewrite::RewriteRequest;
use crate::web::{api_error, AppState};

pub async fn rewrite(
    State(state): State<AppState>,
    body: Result<Json<RewriteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };

    if !state.rewriter.is_configured() {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Rewriting is not configured on this server",
        );
    }

    if request.text.trim().is_empty() {
        return api_error(StatusCode::UNPROCESSABLE_ENTITY, "text must not be empty");
    }

    match state.rewriter.rewrite_request(&request).await {
        Ok(result) => {
            info!(
                keywords = request.keywords.len(),
                chars = result.chars().count(),
                "Rewrote text"
            );
            Json(serde_json::json!({ "result": result })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Rewrite provider failed");
            api_error(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}
