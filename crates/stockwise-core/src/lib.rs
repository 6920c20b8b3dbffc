//! # stockwise-core
//!
//! Core types, configuration, and utilities for Stockwise.
//!
//! This crate provides shared functionality used across all Stockwise crates:
//!
//! - **Configuration**: Loading, environment overrides, and validation
//! - **Types**: Inventory rows and the documents derived from them
//! - **Documents**: Rendering an inventory row into an indexable text block
//! - **Utilities**: Path resolution, environment handling, and secret strings

pub mod config;
pub mod document;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use document::build_document;
pub use error::{ConfigError, Error, Result, RowError};
pub use secret::SecretString;
pub use types::*;
