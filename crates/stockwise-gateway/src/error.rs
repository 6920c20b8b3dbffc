//! Gateway error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stockwise_rag::RagError;
use thiserror::Error;

/// Errors that can occur in the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be used.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An embedding or chat backend failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RagError> for GatewayError {
    fn from(err: RagError) -> Self {
        if err.is_invalid_input() {
            Self::BadRequest(err.to_string())
        } else if err.is_upstream() {
            Self::Upstream(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::BadRequest(msg) | Self::Upstream(msg) | Self::Internal(msg) => msg.clone(),
            Self::Io(e) => e.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rag_error_mapping() {
        assert_eq!(
            GatewayError::from(RagError::EmptyQuestion).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(RagError::ContextTooLarge {
                estimated: 10,
                budget: 5
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Upstream("rate limited".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
