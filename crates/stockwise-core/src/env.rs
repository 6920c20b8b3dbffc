//! Environment variable handling.

use std::env;
use std::path::Path;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load environment variables from a `.env` file in the working directory.
///
/// Variables already present in the process environment win.
pub fn load_dotenv() -> Result<(), std::io::Error> {
    load_dotenv_from(Path::new(".env"))
}

/// Load environment variables from a specific dotenv file, if it exists.
pub fn load_dotenv_from(path: &Path) -> Result<(), std::io::Error> {
    if !path.exists() {
        return Ok(());
    }

    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        let line = line.trim();

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            // Remove quotes if present
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);

            if env::var(key).is_err() {
                env::set_var(key, value);
            }
        }
    }
    Ok(())
}

/// Environment variable names read by Stockwise.
pub mod vars {
    /// API key for the embedding and chat backends.
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

    /// Base URL override for OpenAI-compatible backends.
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

    /// Config file override.
    pub const STOCKWISE_CONFIG: &str = "STOCKWISE_CONFIG";

    /// Chat model override.
    pub const STOCKWISE_CHAT_MODEL: &str = "STOCKWISE_CHAT_MODEL";

    /// Embedding model override.
    pub const STOCKWISE_EMBEDDING_MODEL: &str = "STOCKWISE_EMBEDDING_MODEL";

    /// Generation temperature override.
    pub const STOCKWISE_TEMPERATURE: &str = "STOCKWISE_TEMPERATURE";

    /// Source CSV path override.
    pub const STOCKWISE_CSV_PATH: &str = "STOCKWISE_CSV_PATH";

    /// Index store directory override.
    pub const STOCKWISE_STORE_DIR: &str = "STOCKWISE_STORE_DIR";

    /// Retrieval breadth override.
    pub const STOCKWISE_K: &str = "STOCKWISE_K";

    /// Listen host override.
    pub const STOCKWISE_HOST: &str = "STOCKWISE_HOST";

    /// Listen port override.
    pub const STOCKWISE_PORT: &str = "STOCKWISE_PORT";

    /// Log level override.
    pub const STOCKWISE_LOG: &str = "STOCKWISE_LOG";
}
