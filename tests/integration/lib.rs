//! Shared fixtures for the integration tests.
//!
//! The fakes stand in for the embedding and chat backends so the whole
//! pipeline runs offline.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stockwise_memory::{EmbeddingProvider, Retriever, VectorIndex};
use stockwise_providers::{ChatOptions, ChatResponse, Message, Provider};
use stockwise_rag::{AnswerGenerator, QueryService};

/// CSV header used by the fixtures.
pub const HEADER: &str = "sku,warehouse,txn_date,txn_type,quantity,notes";

const DIMENSION: usize = 32;

/// Bag-of-words embeddings hashed into a fixed number of buckets.
#[derive(Default)]
pub struct HashEmbeddings {
    texts: AtomicUsize,
}

impl HashEmbeddings {
    /// Number of texts embedded so far.
    pub fn embedded(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }

    fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIMENSION];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
            v[bucket % DIMENSION] += 1.0;
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddings {
    fn model(&self) -> &str {
        "hash-bow"
    }

    async fn embed(&self, texts: &[String]) -> stockwise_memory::Result<Vec<Vec<f32>>> {
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// Chat provider that records prompts and answers with a fixed reply.
#[derive(Default)]
pub struct ScriptedProvider {
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    /// Reply sent for every request.
    pub const REPLY: &'static str = "Based on the records, ABC123 sold 5 units.";

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<Vec<Message>> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        _options: Option<ChatOptions>,
    ) -> stockwise_providers::Result<ChatResponse> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(messages.to_vec());
        }
        Ok(ChatResponse::text(model, Self::REPLY))
    }
}

/// Write an inventory CSV with the given data lines under `dir`.
pub fn write_csv(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("inventory.csv");
    let mut content = format!("{}\n", HEADER);
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).expect("write fixture csv");
    path
}

/// Everything needed to drive a query service in a test.
pub struct Harness {
    pub index: Arc<VectorIndex>,
    pub embeddings: Arc<HashEmbeddings>,
    pub provider: Arc<ScriptedProvider>,
    pub service: Arc<QueryService>,
}

impl Harness {
    /// Build (or reopen) the index at `store` from `csv` and wire a service.
    pub async fn start(csv: &Path, store: &Path, k: usize) -> Harness {
        let embeddings = Arc::new(HashEmbeddings::default());
        let index = Arc::new(VectorIndex::new(embeddings.clone(), store));
        index.build_from(csv).await.expect("index ready");

        let provider = Arc::new(ScriptedProvider::default());
        let service = Arc::new(QueryService::new(
            Retriever::new(index.clone()).with_k(k),
            AnswerGenerator::new(provider.clone(), "test-model"),
        ));

        Harness {
            index,
            embeddings,
            provider,
            service,
        }
    }
}
