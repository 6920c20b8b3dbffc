//! Serve command: index then answer questions over HTTP.

use super::IndexOverrides;
use clap::Args;
use std::sync::Arc;
use stockwise_core::Config;
use stockwise_gateway::{Gateway, GatewayConfig};
use stockwise_providers::openai::OpenAIProvider;
use stockwise_rag::QueryService;
use tracing::info;

/// Serve command arguments.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable CORS headers
    #[arg(long)]
    pub no_cors: bool,

    #[command(flatten)]
    pub index: IndexOverrides,
}

impl ServeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_cors {
            config.server.cors = false;
        }
        self.index.apply(config);
    }
}

/// Run the serve command.
pub async fn run(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);

    // The server only starts once the index is usable.
    let index = super::ready_index(&config).await?;
    let provider = Arc::new(OpenAIProvider::from_config(&config.openai)?);
    let service = Arc::new(QueryService::from_config(&config, index, provider));

    info!(
        chat_model = %config.openai.chat_model,
        k = config.retrieval.k,
        "Query service ready"
    );

    Gateway::new(GatewayConfig::from(&config.server), service)
        .run()
        .await?;
    Ok(())
}
