//! Configuration schema definitions.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Stockwise configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Embedding and chat backend settings.
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Index build settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Retrieval and answer settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenAI-compatible backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key. Normally supplied through `OPENAI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// API base URL, including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat completion model.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature for answers.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout for each outbound request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_request_timeout() -> u64 {
    300
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Index build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Source CSV of inventory transactions.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    /// Directory holding the persisted vector store.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Documents sent per embedding request.
    #[serde(default = "default_batch_size")]
    pub embedding_batch_size: usize,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("inventory_history.csv")
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("inventory_index")
}

fn default_batch_size() -> usize {
    100
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            store_dir: default_store_dir(),
            embedding_batch_size: default_batch_size(),
        }
    }
}

/// Upper bound on the characters of each source returned to callers.
pub const MAX_PREVIEW_CHARS: usize = 500;

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Documents retrieved per question.
    #[serde(default = "default_k")]
    pub k: usize,

    /// Characters of each source echoed back to the caller, at most
    /// [`MAX_PREVIEW_CHARS`].
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Minimum similarity score for a document to be used. Unset keeps
    /// every one of the top `k`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,

    /// Estimated token budget for the assembled prompt.
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,
}

fn default_k() -> usize {
    10
}

fn default_preview_chars() -> usize {
    MAX_PREVIEW_CHARS
}

fn default_max_context_tokens() -> usize {
    100_000
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            preview_chars: default_preview_chars(),
            min_score: None,
            max_context_tokens: default_max_context_tokens(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: default_cors(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
