//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the Stockwise base directory (~/.stockwise).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".stockwise"))
}

/// Get the main config file path (~/.stockwise/stockwise.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("stockwise.json5"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Sibling path used to serialize index builds across processes.
pub fn lock_file_for(store_dir: &Path) -> PathBuf {
    sibling_with_suffix(store_dir, ".lock")
}

/// Sibling directory an index build writes into before it is committed.
pub fn staging_dir_for(store_dir: &Path, token: &str) -> PathBuf {
    sibling_with_suffix(store_dir, &format!(".building-{}", token))
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "index".into());
    name.push(suffix);
    path.with_file_name(name)
}
