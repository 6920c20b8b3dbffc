//! CLI command implementations.

pub mod ask;
pub mod config;
pub mod index;
pub mod serve;

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use stockwise_core::Config;
use stockwise_memory::{OpenAIEmbeddings, VectorIndex};
use tracing::info;

/// Index location overrides shared by `serve` and `index`.
#[derive(clap::Args, Debug, Default)]
pub struct IndexOverrides {
    /// Inventory CSV to index
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Directory holding the persisted index
    #[arg(long)]
    pub store: Option<PathBuf>,
}

impl IndexOverrides {
    /// Apply the overrides on top of the resolved config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(csv) = &self.csv {
            config.index.csv_path = csv.clone();
        }
        if let Some(store) = &self.store {
            config.index.store_dir = store.clone();
        }
    }
}

/// Load the persisted index, building it from the CSV first if needed.
pub async fn ready_index(config: &Config) -> anyhow::Result<Arc<VectorIndex>> {
    config.require_api_key()?;
    let embeddings = Arc::new(OpenAIEmbeddings::from_config(&config.openai)?);
    let index = Arc::new(VectorIndex::from_config(&config.index, embeddings));

    let handle = index
        .ensure_ready()
        .await
        .with_context(|| format!("Failed to prepare index at {}", index.store_dir().display()))?;

    let documents = handle.len().await;
    info!(
        documents,
        store = %handle.dir().display(),
        "Index ready"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_paths() {
        let mut config = Config::default();
        let default_store = config.index.store_dir.clone();

        IndexOverrides {
            csv: Some(PathBuf::from("other.csv")),
            store: None,
        }
        .apply(&mut config);

        assert_eq!(config.index.csv_path, PathBuf::from("other.csv"));
        assert_eq!(config.index.store_dir, default_store);
    }

    #[tokio::test]
    async fn test_ready_index_requires_api_key() {
        let mut config = Config::default();
        config.openai.api_key = None;
        assert!(ready_index(&config).await.is_err());
    }
}
