//! Question answering over the inventory index.
//!
//! [`QueryService`] validates a question, pulls the most similar inventory
//! documents through a [`stockwise_memory::Retriever`], and hands them to an
//! [`AnswerGenerator`] that stuffs them into a single chat prompt.

pub mod error;
pub mod generator;
pub mod service;

pub use error::{RagError, Result};
pub use generator::{AnswerGenerator, SYSTEM_PROMPT};
pub use service::{preview, AnswerResponse, QueryService, Source};
