//! Chat completion providers for Stockwise.
//!
//! The answer generator talks to a [`Provider`]; [`openai::OpenAIProvider`]
//! is the OpenAI-compatible implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockwise_providers::{ChatOptions, Message, Provider, openai::OpenAIProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAIProvider::new("your-api-key")?;
//!
//!     let messages = vec![Message::user("Which SKUs sold out last week?")];
//!     let options = ChatOptions::default().temperature(0.1);
//!
//!     let response = provider.chat("gpt-4.1-mini", &messages, Some(options)).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

mod error;
mod types;

pub mod openai;

pub use error::{ProviderError, Result};
pub use types::*;

use async_trait::async_trait;

/// A model provider that can generate chat completions.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get provider name.
    fn name(&self) -> &str;

    /// Generate a chat completion.
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse>;

    /// Estimate the token count of a conversation.
    ///
    /// The default assumes roughly four characters per token.
    fn estimate_tokens(&self, messages: &[Message]) -> usize {
        let chars: usize = messages.iter().map(|m| m.content.chars().count()).sum();
        chars.div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(
            &self,
            model: &str,
            messages: &[Message],
            _options: Option<ChatOptions>,
        ) -> Result<ChatResponse> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(ChatResponse::text(model, last))
        }
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        let messages = vec![Message::system("abcd"), Message::user("efg")];
        assert_eq!(Echo.estimate_tokens(&messages), 2);
        assert_eq!(Echo.estimate_tokens(&[]), 0);
    }

    #[tokio::test]
    async fn test_provider_object_safety() {
        let provider: std::sync::Arc<dyn Provider> = std::sync::Arc::new(Echo);
        let response = provider
            .chat("m", &[Message::user("hi")], None)
            .await
            .unwrap();
        assert_eq!(response.content, "hi");
    }
}
