//! HTTP gateway for Stockwise.
//!
//! This crate provides:
//! - `POST /rag-inventory-search` answering questions over the inventory index
//! - `GET /health` reporting status and index size
//! - `GET /` serving the web UI
//!
//! CORS is open to any origin when enabled.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::GatewayError;
pub use handlers::AppState;
pub use server::{Gateway, GatewayConfig};

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
