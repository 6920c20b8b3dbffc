//! Semantic search over the inventory index.

use crate::index::VectorIndex;
use crate::{MemoryEntry, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use stockwise_core::config::RetrievalConfig;
use stockwise_core::DocumentMetadata;

/// Search query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text.
    pub text: String,

    /// Maximum results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Minimum similarity score (-1.0 - 1.0).
    #[serde(default)]
    pub min_score: Option<f32>,

    /// Exact-match filters on metadata keys.
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

fn default_limit() -> usize {
    10
}

impl SearchQuery {
    /// Create a new search query.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: default_limit(),
            min_score: None,
            filters: HashMap::new(),
        }
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the minimum score threshold.
    pub fn with_min_score(mut self, score: f32) -> Self {
        self.min_score = Some(score);
        self
    }

    /// Add a metadata filter.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    fn accepts(&self, result: &SearchResult) -> bool {
        if matches!(self.min_score, Some(min) if result.score < min) {
            return false;
        }
        self.filters
            .iter()
            .all(|(key, value)| result.entry.metadata.get(key) == Some(value.as_str()))
    }
}

/// Search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The stored entry.
    pub entry: MemoryEntry,

    /// Cosine similarity score.
    pub score: f32,
}

impl SearchResult {
    /// Document body.
    pub fn content(&self) -> &str {
        &self.entry.content
    }

    /// Identifying fields.
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.entry.metadata
    }
}

/// Retrieves the documents most relevant to a question.
pub struct Retriever {
    index: Arc<VectorIndex>,
    k: usize,
    min_score: Option<f32>,
}

impl Retriever {
    /// Create a retriever over a ready index.
    pub fn new(index: Arc<VectorIndex>) -> Self {
        Self {
            index,
            k: default_limit(),
            min_score: None,
        }
    }

    /// Create a retriever from the retrieval section of the config.
    pub fn from_config(index: Arc<VectorIndex>, config: &RetrievalConfig) -> Self {
        let retriever = Self::new(index).with_k(config.k);
        match config.min_score {
            Some(score) => retriever.with_min_score(score),
            None => retriever,
        }
    }

    /// Set the default number of documents per question.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Drop documents scoring below `score`.
    pub fn with_min_score(mut self, score: f32) -> Self {
        self.min_score = Some(score);
        self
    }

    /// Default number of documents per question.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The index being searched.
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Return up to `k` documents for `query`, best match first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let mut search = SearchQuery::new(query).with_limit(k);
        search.min_score = self.min_score;
        self.search(search).await
    }

    /// Run a full search query.
    pub async fn search(&self, query: SearchQuery) -> Result<Vec<SearchResult>> {
        // Filters can reject any of the top hits, so rank everything then.
        let candidates = if query.filters.is_empty() {
            query.limit
        } else {
            self.index.len().await.max(query.limit)
        };

        let results = self.index.search(&query.text, candidates).await?;

        Ok(results
            .into_iter()
            .filter(|r| query.accepts(r))
            .take(query.limit)
            .collect())
    }
}
