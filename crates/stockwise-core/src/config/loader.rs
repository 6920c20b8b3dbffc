//! Configuration loading, environment overrides, and persistence.

use super::{Config, LogLevel, MAX_PREVIEW_CHARS};
use crate::env::{self, vars};
use crate::error::ConfigError;
use crate::paths;
use crate::secret::{SecretString, REDACTED};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded config file");
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Resolve the effective configuration for a process.
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// used when present and built-in defaults otherwise. Environment
    /// overrides are applied last and the result is validated.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(&paths::expand_tilde(path))?,
            None => match Self::load_default() {
                Ok(config) => config,
                Err(ConfigError::NotFound(path)) => {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                }
                Err(e) => return Err(e),
            },
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; JSON is valid JSON5.
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// A copy that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.openai.api_key.is_some() {
            copy.openai.api_key = Some(SecretString::new(REDACTED));
        }
        copy
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(env::get_var)
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(
            lookup: &dyn Fn(&str) -> Option<String>,
            var: &str,
        ) -> Result<Option<T>, ConfigError> {
            match lookup(var) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidEnv {
                        var: var.to_string(),
                        value: raw,
                    }),
                None => Ok(None),
            }
        }

        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;

        if let Some(key) = lookup(vars::OPENAI_API_KEY) {
            self.openai.api_key = Some(SecretString::new(key));
        }
        if let Some(url) = lookup(vars::OPENAI_BASE_URL) {
            self.openai.base_url = url;
        }
        if let Some(model) = lookup(vars::STOCKWISE_CHAT_MODEL) {
            self.openai.chat_model = model;
        }
        if let Some(model) = lookup(vars::STOCKWISE_EMBEDDING_MODEL) {
            self.openai.embedding_model = model;
        }
        if let Some(temperature) = parsed::<f32>(lookup, vars::STOCKWISE_TEMPERATURE)? {
            self.openai.temperature = temperature;
        }
        if let Some(path) = lookup(vars::STOCKWISE_CSV_PATH) {
            self.index.csv_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(vars::STOCKWISE_STORE_DIR) {
            self.index.store_dir = PathBuf::from(path);
        }
        if let Some(k) = parsed::<usize>(lookup, vars::STOCKWISE_K)? {
            self.retrieval.k = k;
        }
        if let Some(host) = lookup(vars::STOCKWISE_HOST) {
            self.server.host = host;
        }
        if let Some(port) = parsed::<u16>(lookup, vars::STOCKWISE_PORT)? {
            self.server.port = port;
        }
        if let Some(level) = lookup(vars::STOCKWISE_LOG) {
            self.logging.level = level
                .parse::<LogLevel>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: vars::STOCKWISE_LOG.to_string(),
                    value: level,
                })?;
        }

        Ok(())
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = url::Url::parse(&self.openai.base_url) {
            errors.push(format!(
                "openai.base_url '{}' is not a valid URL: {}",
                self.openai.base_url, e
            ));
        }
        if self.openai.chat_model.trim().is_empty() {
            errors.push("openai.chat_model must not be empty".to_string());
        }
        if self.openai.embedding_model.trim().is_empty() {
            errors.push("openai.embedding_model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.openai.temperature) {
            errors.push(format!(
                "openai.temperature must be between 0 and 2, got {}",
                self.openai.temperature
            ));
        }
        if self.openai.request_timeout_secs == 0 {
            errors.push("openai.request_timeout_secs must be greater than 0".to_string());
        }

        if self.index.embedding_batch_size == 0 {
            errors.push("index.embedding_batch_size must be greater than 0".to_string());
        }
        if self.index.store_dir.as_os_str().is_empty() {
            errors.push("index.store_dir must not be empty".to_string());
        }

        if self.retrieval.k == 0 {
            errors.push("retrieval.k must be greater than 0".to_string());
        }
        if !(1..=MAX_PREVIEW_CHARS).contains(&self.retrieval.preview_chars) {
            errors.push(format!(
                "retrieval.preview_chars must be between 1 and {}, got {}",
                MAX_PREVIEW_CHARS, self.retrieval.preview_chars
            ));
        }
        if let Some(min_score) = self.retrieval.min_score {
            if !(-1.0..=1.0).contains(&min_score) {
                errors.push(format!(
                    "retrieval.min_score must be between -1 and 1, got {}",
                    min_score
                ));
            }
        }
        if self.retrieval.max_context_tokens == 0 {
            errors.push("retrieval.max_context_tokens must be greater than 0".to_string());
        }

        if self.server.port == 0 {
            errors.push("server.port cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// The backend API key, required by commands that talk to the backends.
    pub fn require_api_key(&self) -> Result<&SecretString, ConfigError> {
        self.openai
            .api_key
            .as_ref()
            .filter(|k| !k.is_blank())
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "{} is not set; export it or add openai.api_key to the config file",
                    vars::OPENAI_API_KEY
                ))
            })
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.openai.api_key = Some(SecretString::new(key));
        self
    }

    /// Set the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.openai.base_url = url.into();
        self
    }

    /// Set the source CSV path.
    pub fn csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.index.csv_path = path.into();
        self
    }

    /// Set the store directory.
    pub fn store_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.index.store_dir = path.into();
        self
    }

    /// Set the retrieval breadth.
    pub fn k(mut self, k: usize) -> Self {
        self.config.retrieval.k = k;
        self
    }

    /// Set the listen port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}
