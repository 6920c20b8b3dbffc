//! Vector memory for Stockwise.
//!
//! This crate provides:
//! - Embedding generation via OpenAI-compatible APIs
//! - Vector storage, in memory and persisted to a store directory
//! - CSV ingestion of inventory transactions
//! - The [`VectorIndex`] lifecycle and the [`Retriever`] on top of it

pub mod embeddings;
pub mod error;
pub mod index;
pub mod ingest;
pub mod search;
pub mod store;

pub use embeddings::{cosine_similarity, EmbeddingProvider, OpenAIEmbeddings};
pub use error::MemoryError;
pub use index::{IndexHandle, IndexState, VectorIndex};
pub use search::{Retriever, SearchQuery, SearchResult};
pub use store::{DirVectorStore, MemoryVectorStore, StoreManifest, VectorStore};

use stockwise_core::{DocumentMetadata, IndexedDocument};

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;

/// A stored document with its vector embedding.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MemoryEntry {
    /// Unique identifier.
    pub id: String,

    /// Document body.
    pub content: String,

    /// Vector embedding.
    pub embedding: Vec<f32>,

    /// Identifying fields of the source row.
    pub metadata: DocumentMetadata,

    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MemoryEntry {
    /// Create a new entry for a document.
    pub fn new(document: IndexedDocument, embedding: Vec<f32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: document.content,
            embedding,
            metadata: document.metadata,
            created_at: chrono::Utc::now(),
        }
    }

    /// The document this entry was built from.
    pub fn document(&self) -> IndexedDocument {
        IndexedDocument {
            content: self.content.clone(),
            metadata: self.metadata.clone(),
        }
    }
}
