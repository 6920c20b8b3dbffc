//! Answer generation by prompt stuffing.

use crate::error::{RagError, Result};
use std::sync::Arc;
use stockwise_core::Config;
use stockwise_memory::SearchResult;
use stockwise_providers::{ChatOptions, Message, Provider};
use tracing::debug;

/// Instruction placed ahead of the retrieved context.
pub const SYSTEM_PROMPT: &str = "You answer questions about inventory transactions. \
Use only the context below. If the context does not contain the answer, say that you \
don't know instead of making one up.";

const CONTEXT_SEPARATOR: &str = "\n----------------\n";

/// Produces an answer grounded in retrieved documents.
pub struct AnswerGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_context_tokens: usize,
}

impl AnswerGenerator {
    /// Create a generator for `model`.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.1,
            max_context_tokens: 100_000,
        }
    }

    /// Create a generator from the config.
    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self::new(provider, config.openai.chat_model.clone())
            .with_temperature(config.openai.temperature)
            .with_max_context_tokens(config.retrieval.max_context_tokens)
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the prompt budget, in estimated tokens.
    pub fn with_max_context_tokens(mut self, max_context_tokens: usize) -> Self {
        self.max_context_tokens = max_context_tokens;
        self
    }

    /// Chat model in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assemble the prompt: every document body, blank-line separated, then
    /// the question.
    pub fn build_messages(&self, question: &str, documents: &[SearchResult]) -> Vec<Message> {
        let context = documents
            .iter()
            .map(SearchResult::content)
            .collect::<Vec<_>>()
            .join("\n\n");

        vec![
            Message::system(format!("{}{}{}", SYSTEM_PROMPT, CONTEXT_SEPARATOR, context)),
            Message::user(question),
        ]
    }

    /// Answer `question` from `documents`.
    pub async fn generate(&self, question: &str, documents: &[SearchResult]) -> Result<String> {
        let messages = self.build_messages(question, documents);

        let estimated = self.provider.estimate_tokens(&messages);
        if estimated > self.max_context_tokens {
            return Err(RagError::ContextTooLarge {
                estimated,
                budget: self.max_context_tokens,
            });
        }

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            documents = documents.len(),
            estimated_tokens = estimated,
            "Generating answer"
        );

        let options = ChatOptions::default().temperature(self.temperature);
        let response = self
            .provider
            .chat(&self.model, &messages, Some(options))
            .await?;

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Answer generated"
        );

        Ok(response.content)
    }
}
