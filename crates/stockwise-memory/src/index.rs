//! The inventory vector index.
//!
//! A [`VectorIndex`] starts out unbuilt. [`VectorIndex::ensure_ready`] moves it
//! to ready exactly once: it opens the store directory if one exists and
//! otherwise builds it from the source CSV. A build embeds every row into a
//! staging directory next to the store and renames it into place at the end,
//! so an interrupted build leaves no store behind.

use crate::embeddings::EmbeddingProvider;
use crate::error::MemoryError;
use crate::ingest;
use crate::search::SearchResult;
use crate::store::{DirVectorStore, StoreManifest, VectorStore};
use crate::{MemoryEntry, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockwise_core::config::IndexConfig;
use stockwise_core::{build_document, paths, IndexedDocument};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Lifecycle state of a [`VectorIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// Neither built nor opened yet.
    Unbuilt,
    /// Backed by a persisted store.
    Ready,
}

/// Read-only handle to a ready index store.
#[derive(Clone, Debug)]
pub struct IndexHandle {
    store: Arc<DirVectorStore>,
}

impl IndexHandle {
    fn new(store: DirVectorStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Number of indexed documents.
    pub async fn len(&self) -> usize {
        self.store.manifest().await.count
    }

    /// Whether the index holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Manifest of the underlying store.
    pub async fn manifest(&self) -> StoreManifest {
        self.store.manifest().await
    }

    /// Store directory.
    pub fn dir(&self) -> &Path {
        self.store.dir()
    }
}

/// Embedding-backed index over inventory documents.
pub struct VectorIndex {
    store_dir: PathBuf,
    csv_path: PathBuf,
    batch_size: usize,
    embeddings: Arc<dyn EmbeddingProvider>,
    handle: OnceCell<IndexHandle>,
}

impl VectorIndex {
    /// Create an unbuilt index persisted at `store_dir`.
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, store_dir: impl Into<PathBuf>) -> Self {
        let defaults = IndexConfig::default();
        Self {
            store_dir: store_dir.into(),
            csv_path: defaults.csv_path,
            batch_size: defaults.embedding_batch_size,
            embeddings,
            handle: OnceCell::new(),
        }
    }

    /// Create an unbuilt index from the index section of the config.
    pub fn from_config(config: &IndexConfig, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self::new(embeddings, paths::expand_tilde(&config.store_dir))
            .with_csv_path(paths::expand_tilde(&config.csv_path))
            .with_batch_size(config.embedding_batch_size)
    }

    /// Set the CSV used by [`VectorIndex::ensure_ready`].
    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }

    /// Set how many documents go into one embedding request.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Store directory.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Current lifecycle state.
    pub fn state(&self) -> IndexState {
        if self.handle.initialized() {
            IndexState::Ready
        } else {
            IndexState::Unbuilt
        }
    }

    /// Number of indexed documents, zero while unbuilt.
    pub async fn len(&self) -> usize {
        match self.handle.get() {
            Some(handle) => handle.len().await,
            None => 0,
        }
    }

    /// Whether the index holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Make the index ready, building it from the configured CSV if needed.
    pub async fn ensure_ready(&self) -> Result<IndexHandle> {
        self.build_from(&self.csv_path).await
    }

    /// Make the index ready, building it from `csv_path` if no store exists.
    ///
    /// An existing store is opened instead and nothing is re-embedded.
    /// Concurrent callers share one build, in this process and across
    /// processes using the same store directory.
    pub async fn build_from(&self, csv_path: &Path) -> Result<IndexHandle> {
        self.handle
            .get_or_try_init(|| self.build_or_open(csv_path))
            .await
            .cloned()
    }

    /// Make the index ready from an existing store, never building.
    pub async fn open(&self) -> Result<IndexHandle> {
        self.handle
            .get_or_try_init(|| async {
                let store = DirVectorStore::open(&self.store_dir)?;
                self.check_model(&store.manifest().await);
                Ok::<_, MemoryError>(IndexHandle::new(store))
            })
            .await
            .cloned()
    }

    /// Embed `query` and return the `k` most similar documents.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let handle = self.handle.get().ok_or(MemoryError::NotReady)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embeddings.embed_one(query).await?;
        let results = handle.store.search(&embedding, k).await?;

        Ok(results
            .into_iter()
            .map(|(entry, score)| SearchResult { entry, score })
            .collect())
    }

    async fn build_or_open(&self, csv_path: &Path) -> Result<IndexHandle> {
        if let Some(parent) = self.store_dir.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let _lock = BuildLock::acquire(paths::lock_file_for(&self.store_dir)).await?;
        // Holding the lock, no other build can own a staging directory.
        sweep_staging(&self.store_dir);

        let store = if self.store_dir.exists() {
            info!(store = %self.store_dir.display(), "Loading existing index");
            let store = DirVectorStore::open(&self.store_dir)?;
            let manifest = store.manifest().await;
            self.check_model(&manifest);
            warn_if_stale(&manifest, csv_path);
            store
        } else {
            self.build(csv_path).await?
        };

        Ok(IndexHandle::new(store))
    }

    async fn build(&self, csv_path: &Path) -> Result<DirVectorStore> {
        info!(
            csv = %csv_path.display(),
            store = %self.store_dir.display(),
            "Building index"
        );

        let source = ingest::load_csv(csv_path)?;
        let documents: Vec<IndexedDocument> = source.rows.iter().map(build_document).collect();
        info!(rows = documents.len(), "Loaded inventory rows");

        let staging = paths::staging_dir_for(
            &self.store_dir,
            &uuid::Uuid::new_v4().simple().to_string(),
        );
        let manifest = StoreManifest::new(self.embeddings.model())
            .with_source_fingerprint(source.fingerprint);
        let store = DirVectorStore::create(&staging, manifest)?;

        let committed = match self.fill(&store, documents).await {
            Ok(()) => store.commit(&self.store_dir).await,
            Err(e) => Err(e),
        };

        match committed {
            Ok(store) => {
                let documents = store.count().await?;
                info!(
                    documents,
                    store = %self.store_dir.display(),
                    "Index committed"
                );
                Ok(store)
            }
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_dir_all(&staging) {
                    debug!(error = %cleanup, staging = %staging.display(), "Could not remove staging directory");
                }
                Err(e)
            }
        }
    }

    async fn fill(&self, store: &DirVectorStore, documents: Vec<IndexedDocument>) -> Result<()> {
        let total = documents.len();
        let mut embedded = 0;

        for batch in documents.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
            let vectors = self.embeddings.embed(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(MemoryError::embedding(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }

            let entries = batch
                .iter()
                .cloned()
                .zip(vectors)
                .map(|(document, embedding)| MemoryEntry::new(document, embedding))
                .collect();
            store.insert_batch(entries).await?;

            embedded += batch.len();
            debug!(embedded, total, "Embedded batch");
        }

        Ok(())
    }

    fn check_model(&self, manifest: &StoreManifest) {
        if manifest.embedding_model != self.embeddings.model() {
            warn!(
                store_model = %manifest.embedding_model,
                query_model = %self.embeddings.model(),
                "Index was built with a different embedding model"
            );
        }
    }
}

fn warn_if_stale(manifest: &StoreManifest, csv_path: &Path) {
    let Some(recorded) = manifest.source_fingerprint.as_deref() else {
        return;
    };

    match ingest::fingerprint_file(csv_path) {
        Ok(current) if current != recorded => warn!(
            csv = %csv_path.display(),
            "Source CSV changed since the index was built; serving the existing index"
        ),
        Ok(_) => {}
        Err(e) => debug!(error = %e, "Skipping source freshness check"),
    }
}

/// Remove staging directories left behind by builds that never finished.
fn sweep_staging(store_dir: &Path) {
    let pattern = paths::staging_dir_for(store_dir, "");
    let (Some(parent), Some(prefix)) = (pattern.parent(), pattern.file_name()) else {
        return;
    };
    let prefix = prefix.to_string_lossy().into_owned();
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    let Ok(entries) = std::fs::read_dir(parent) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_name().to_string_lossy().starts_with(&prefix) || !path.is_dir() {
            continue;
        }
        match std::fs::remove_dir_all(&path) {
            Ok(()) => info!(staging = %path.display(), "Removed stale staging directory"),
            Err(e) => debug!(error = %e, staging = %path.display(), "Could not remove staging directory"),
        }
    }
}

/// Exclusive advisory lock held for the duration of a build.
struct BuildLock {
    file: File,
}

impl BuildLock {
    async fn acquire(path: PathBuf) -> Result<Self> {
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<File> {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;
            FileExt::lock_exclusive(&file)?;
            Ok(file)
        })
        .await
        .map_err(|e| MemoryError::store(format!("lock task failed: {}", e)))??;

        Ok(Self { file })
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
