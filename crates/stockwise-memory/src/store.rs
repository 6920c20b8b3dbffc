//! Vector storage implementations.

use crate::embeddings::cosine_similarity;
use crate::error::MemoryError;
use crate::{MemoryEntry, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Manifest file name inside a store directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Entries file name inside a store directory.
pub const ENTRIES_FILE: &str = "entries.json";

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// Trait for vector stores.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert multiple entries.
    async fn insert_batch(&self, entries: Vec<MemoryEntry>) -> Result<()>;

    /// Search for similar entries, best match first.
    ///
    /// Entries with equal scores keep their insertion order.
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<(MemoryEntry, f32)>>;

    /// Count entries.
    async fn count(&self) -> Result<usize>;
}

/// In-memory vector store. Entries are kept in insertion order.
pub struct MemoryVectorStore {
    entries: RwLock<Vec<MemoryEntry>>,
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Create a store holding the given entries.
    pub fn from_entries(entries: Vec<MemoryEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

fn rank(entries: &[MemoryEntry], query: &[f32], limit: usize) -> Vec<(MemoryEntry, f32)> {
    let mut results: Vec<(MemoryEntry, f32)> = entries
        .iter()
        .map(|entry| {
            let score = cosine_similarity(query, &entry.embedding);
            (entry.clone(), score)
        })
        .collect();

    // Stable sort, score descending
    results.sort_by(|a, b| b.1.total_cmp(&a.1));
    results.truncate(limit);
    results
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn insert_batch(&self, batch: Vec<MemoryEntry>) -> Result<()> {
        self.entries.write().await.extend(batch);
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<(MemoryEntry, f32)>> {
        let entries = self.entries.read().await;
        Ok(rank(&entries, query, limit))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}

/// Description of a persisted store, written next to its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    /// On-disk format version.
    pub format_version: u32,

    /// Number of entries.
    pub count: usize,

    /// Model the entries were embedded with.
    pub embedding_model: String,

    /// Embedding dimension, zero for an empty store.
    pub dimension: usize,

    /// When the store was built.
    pub created_at: DateTime<Utc>,

    /// SHA-256 of the source CSV at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fingerprint: Option<String>,
}

impl StoreManifest {
    /// Create a manifest for an empty store.
    pub fn new(embedding_model: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            count: 0,
            embedding_model: embedding_model.into(),
            dimension: 0,
            created_at: Utc::now(),
            source_fingerprint: None,
        }
    }

    /// Record the fingerprint of the source the store was built from.
    pub fn with_source_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.source_fingerprint = Some(fingerprint.into());
        self
    }
}

/// Directory-backed vector store.
///
/// A store directory holds `manifest.json` and `entries.json`. Inserts stay
/// in memory until [`DirVectorStore::persist`] or [`DirVectorStore::commit`]
/// writes them out; each file is written to a temporary path and renamed.
pub struct DirVectorStore {
    dir: PathBuf,
    manifest: RwLock<StoreManifest>,
    entries: MemoryVectorStore,
}

impl DirVectorStore {
    /// Create an empty store rooted at `dir`, creating the directory.
    pub fn create(dir: impl Into<PathBuf>, manifest: StoreManifest) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            manifest: RwLock::new(manifest),
            entries: MemoryVectorStore::new(),
        })
    }

    /// Load a persisted store.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(MemoryError::store(format!(
                "store directory {} does not exist",
                dir.display()
            )));
        }

        let manifest: StoreManifest =
            serde_json::from_str(&std::fs::read_to_string(dir.join(MANIFEST_FILE))?)?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(MemoryError::store(format!(
                "unsupported store format version {}",
                manifest.format_version
            )));
        }

        let entries: Vec<MemoryEntry> =
            serde_json::from_str(&std::fs::read_to_string(dir.join(ENTRIES_FILE))?)?;
        if entries.len() != manifest.count {
            return Err(MemoryError::store(format!(
                "manifest lists {} entries but {} were found",
                manifest.count,
                entries.len()
            )));
        }

        Ok(Self {
            dir,
            manifest: RwLock::new(manifest),
            entries: MemoryVectorStore::from_entries(entries),
        })
    }

    /// Directory the store lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot of the manifest.
    pub async fn manifest(&self) -> StoreManifest {
        self.manifest.read().await.clone()
    }

    /// Write the manifest and entries to the store directory.
    pub async fn persist(&self) -> Result<()> {
        let entries = self.entries.entries.read().await;
        let mut manifest = self.manifest.write().await;
        manifest.count = entries.len();
        manifest.dimension = entries.first().map(|e| e.embedding.len()).unwrap_or(0);

        write_atomic(&self.dir.join(ENTRIES_FILE), &serde_json::to_vec(&*entries)?)?;
        write_atomic(
            &self.dir.join(MANIFEST_FILE),
            &serde_json::to_vec_pretty(&*manifest)?,
        )?;
        Ok(())
    }

    /// Persist, then move the whole directory to `target`.
    ///
    /// Fails if `target` already exists.
    pub async fn commit(mut self, target: impl Into<PathBuf>) -> Result<Self> {
        let target = target.into();
        self.persist().await?;
        if target.exists() {
            return Err(MemoryError::store(format!(
                "refusing to replace existing store at {}",
                target.display()
            )));
        }
        std::fs::rename(&self.dir, &target)?;
        self.dir = target;
        Ok(self)
    }
}

impl std::fmt::Debug for DirVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("DirVectorStore");
        debug.field("dir", &self.dir);
        match self.manifest.try_read() {
            Ok(manifest) => debug.field("manifest", &*manifest),
            Err(_) => debug.field("manifest", &"<locked>"),
        };
        debug.finish_non_exhaustive()
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[async_trait]
impl VectorStore for DirVectorStore {
    async fn insert_batch(&self, batch: Vec<MemoryEntry>) -> Result<()> {
        let mut entries = self.entries.entries.write().await;
        if let Some(expected) = entries.first().map(|e| e.embedding.len()) {
            if let Some(bad) = batch.iter().find(|e| e.embedding.len() != expected) {
                return Err(MemoryError::store(format!(
                    "embedding dimension {} does not match store dimension {}",
                    bad.embedding.len(),
                    expected
                )));
            }
        }
        entries.extend(batch);
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<(MemoryEntry, f32)>> {
        let dimension = self.manifest.read().await.dimension;
        if dimension != 0 && query.len() != dimension {
            return Err(MemoryError::store(format!(
                "query dimension {} does not match store dimension {}",
                query.len(),
                dimension
            )));
        }
        self.entries.search(query, limit).await
    }

    async fn count(&self) -> Result<usize> {
        self.entries.count().await
    }
}
