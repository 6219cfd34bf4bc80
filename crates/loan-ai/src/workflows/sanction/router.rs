use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::LoanSubmission;
use super::engine::SanctionEngine;

/// Router builder exposing the loan submission endpoint.
pub fn sanction_router(engine: Arc<SanctionEngine>) -> Router {
    Router::new()
        .route("/api/v1/loans", post(submit_handler))
        .with_state(engine)
}

pub(crate) async fn submit_handler(
    State(engine): State<Arc<SanctionEngine>>,
    axum::Json(submission): axum::Json<LoanSubmission>,
) -> Response {
    match engine.run(submission) {
        Ok(state) => (StatusCode::OK, axum::Json(state.decision_view())).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
