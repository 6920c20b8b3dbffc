//! Error types for question answering.

use stockwise_memory::MemoryError;
use stockwise_providers::ProviderError;
use thiserror::Error;

/// Result type for question answering.
pub type Result<T> = std::result::Result<T, RagError>;

/// Errors raised while answering a question.
#[derive(Debug, Error)]
pub enum RagError {
    /// The question was empty or whitespace.
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// The assembled prompt exceeds the configured budget.
    #[error("Retrieved context is too large: about {estimated} tokens, budget is {budget}")]
    ContextTooLarge { estimated: usize, budget: usize },

    /// Retrieval failed.
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] MemoryError),

    /// The chat model failed.
    #[error("Generation failed: {0}")]
    Generation(#[from] ProviderError),
}

impl RagError {
    /// Whether the caller sent something unusable.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::EmptyQuestion)
    }

    /// Whether an external service failed.
    pub fn is_upstream(&self) -> bool {
        match self {
            Self::Retrieval(e) => e.is_upstream(),
            Self::Generation(e) => e.is_upstream(),
            _ => false,
        }
    }
}
