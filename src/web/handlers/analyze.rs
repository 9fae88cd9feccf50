// POST /api/analyze — run one keyword analysis.
//
// Malformed JSON (including a non-list `texts`) is rejected by the extractor
// and reported in the same {"error": ...} shape as validation failures.
// Either the whole report comes back or a single error does. Requests with more
// texts than KEYGAP_MAX_DOCUMENTS (default 3) get a 422; extra texts are never
// silently dropped.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

use crate::analysis::AnalyzeRequest;
use crate::web::{api_error, AppState};

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed analyze request");
            return api_error(rejection.status(), &rejection.body_text());
        }
    };

    match state.analyzer.analyze(&request) {
        Ok(report) => {
            info!(
                texts = report.document_count(),
                vocab_size = report.vocab_size,
                "Analyzed texts"
            );
            Json(report).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Analyze request failed validation");
            api_error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
        }
    }
}
