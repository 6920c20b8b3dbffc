//! Request/response orchestration for questions.

use crate::error::{RagError, Result};
use crate::generator::AnswerGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use stockwise_core::config::MAX_PREVIEW_CHARS;
use stockwise_core::{Config, DocumentMetadata};
use stockwise_memory::{Retriever, VectorIndex};
use stockwise_providers::Provider;
use tracing::info;

/// Default number of characters of each source returned to the caller.
pub const DEFAULT_PREVIEW_CHARS: usize = MAX_PREVIEW_CHARS;

/// One retrieved document as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Identifying fields of the row.
    pub metadata: DocumentMetadata,

    /// Leading characters of the document body.
    pub content: String,
}

/// Answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Generated answer.
    pub answer: String,

    /// Documents the answer was generated from, best match first.
    pub sources: Vec<Source>,
}

/// First `max_chars` characters of `content`.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((end, _)) => content[..end].to_string(),
        None => content.to_string(),
    }
}

/// Answers questions from the inventory index.
///
/// Holds only read-only handles and can be shared across requests.
pub struct QueryService {
    retriever: Retriever,
    generator: AnswerGenerator,
    preview_chars: usize,
}

impl QueryService {
    /// Create a service from a retriever and a generator.
    pub fn new(retriever: Retriever, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Wire up a service over a ready index.
    pub fn from_config(config: &Config, index: Arc<VectorIndex>, provider: Arc<dyn Provider>) -> Self {
        Self::new(
            Retriever::from_config(index, &config.retrieval),
            AnswerGenerator::from_config(provider, config),
        )
        .with_preview_chars(config.retrieval.preview_chars)
    }

    /// Set the preview length of returned sources, capped at
    /// [`MAX_PREVIEW_CHARS`].
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars.min(MAX_PREVIEW_CHARS);
        self
    }

    /// The index answers are drawn from.
    pub fn index(&self) -> &Arc<VectorIndex> {
        self.retriever.index()
    }

    /// Answer one question.
    pub async fn answer(&self, question: &str) -> Result<AnswerResponse> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuestion);
        }

        let started = Instant::now();
        let k = self.retriever.k();

        let documents = self.retriever.retrieve(question, k).await?;
        let answer = self.generator.generate(question, &documents).await?;

        let sources: Vec<Source> = documents
            .iter()
            .map(|doc| Source {
                metadata: doc.metadata().clone(),
                content: preview(doc.content(), self.preview_chars),
            })
            .collect();

        info!(
            k,
            sources = sources.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Answered question"
        );

        Ok(AnswerResponse { answer, sources })
    }
}
