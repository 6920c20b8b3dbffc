//! Index command.

use super::IndexOverrides;
use clap::Args;
use console::style;
use stockwise_core::Config;

/// Index command arguments.
#[derive(Args, Debug)]
pub struct IndexArgs {
    #[command(flatten)]
    pub index: IndexOverrides,
}

/// Build the index, or load it if one is already persisted.
pub async fn run(args: IndexArgs, mut config: Config) -> anyhow::Result<()> {
    args.index.apply(&mut config);

    let index = super::ready_index(&config).await?;
    println!(
        "{} {} documents in {}",
        style("Index ready:").green().bold(),
        index.len().await,
        index.store_dir().display()
    );
    Ok(())
}
