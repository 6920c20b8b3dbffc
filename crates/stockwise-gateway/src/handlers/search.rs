//! Question answering endpoint.

use super::AppState;
use crate::error::GatewayError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use stockwise_rag::AnswerResponse;
use tracing::warn;

/// Body of `POST /rag-inventory-search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

/// `POST /rag-inventory-search`
pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, GatewayError> {
    let Json(request) = payload.map_err(|e| GatewayError::BadRequest(e.body_text()))?;

    match state.service.answer(&request.question).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            if !e.is_invalid_input() {
                warn!(error = %e, upstream = e.is_upstream(), "Question failed");
            }
            Err(e.into())
        }
    }
}
