//! Ask command: terminal client for a running server.

use crate::render;
use clap::Args;
use serde_json::json;
use stockwise_core::Config;
use stockwise_rag::AnswerResponse;
use thiserror::Error;

/// Ask command arguments.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question about the inventory
    pub question: String,

    /// Server base URL (defaults to the configured host and port)
    #[arg(long)]
    pub url: Option<String>,
}

/// Failures surfaced to the terminal user.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Failed to connect to backend at {url}. Make sure the server is running. ({source})")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API Error: {status}\n{body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from backend: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for the question endpoint.
pub struct AskClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AskClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/rag-inventory-search", base_url.trim_end_matches('/')),
        }
    }

    /// Send one question. Blank questions are rejected without a request.
    pub async fn ask(&self, question: &str) -> Result<AnswerResponse, AskError> {
        if question.trim().is_empty() {
            return Err(AskError::EmptyQuestion);
        }

        let connect = |source| AskError::Connect {
            url: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "question": question }))
            .send()
            .await
            .map_err(connect)?;

        let status = response.status();
        let body = response.text().await.map_err(connect)?;

        if !status.is_success() {
            return Err(AskError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Base URL of the locally configured server.
pub fn default_url(config: &Config) -> String {
    let host = match config.server.host.as_str() {
        "0.0.0.0" | "::" => "127.0.0.1".to_string(),
        host if host.contains(':') && !host.starts_with('[') => format!("[{}]", host),
        host => host.to_string(),
    };
    format!("http://{}:{}", host, config.server.port)
}

/// Run the ask command.
pub async fn run(args: AskArgs, config: &Config) -> anyhow::Result<()> {
    let url = args.url.unwrap_or_else(|| default_url(config));

    match AskClient::new(&url).ask(&args.question).await {
        Ok(response) => {
            render::render_answer(&response);
            Ok(())
        }
        Err(AskError::EmptyQuestion) => {
            render::render_warning(&AskError::EmptyQuestion.to_string());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
