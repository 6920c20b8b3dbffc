//! HTTP route handlers.

pub mod health;
pub mod search;
pub mod ui;

use std::sync::Arc;
use std::time::Instant;
use stockwise_rag::QueryService;

pub use health::{health_handler, HealthResponse};
pub use search::{search_handler, QuestionRequest};
pub use ui::index_handler;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Question answering chain, built once at startup.
    pub service: Arc<QueryService>,

    /// When the server started.
    pub started: Instant,
}

impl AppState {
    /// Create state around a ready query service.
    pub fn new(service: Arc<QueryService>) -> Self {
        Self {
            service,
            started: Instant::now(),
        }
    }
}
