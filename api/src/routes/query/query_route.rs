//! POST /query answers a question from one product's documents.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doc_qa::AskOutcome;
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::query::query_request::{QueryRequest, QueryResponse},
};

/// Handler: POST /query
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/query \
///   -H 'content-type: application/json' \
///   -d '{"question":"What are cats?","product_id":"pets"}'
/// ```
pub async fn query(State(state): State<Arc<AppState>>, Json(body): Json<QueryRequest>) -> AppResult<Response> {
    body.validate()?;
    info!(product_id = %body.product_id, "query received");

    match state.pipeline.ask(&body.question, &body.product_id).await? {
        AskOutcome::Answered(best) => {
            Ok(ApiResponse::success(QueryResponse::from(best)).into_response_with_status(StatusCode::OK))
        }
        AskOutcome::NoContent => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
