//! Configuration management commands.

use clap::Args;
use std::path::{Path, PathBuf};
use stockwise_core::config::Config;
use stockwise_core::paths;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets redacted
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Run the config command.
pub fn run(args: ConfigArgs, explicit: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::resolve(explicit)?;
            println!("{}", config.redacted().to_json5()?);
        }

        ConfigCommand::Get { key } => {
            let config = Config::resolve(explicit)?;
            match lookup(&config.redacted(), &key)? {
                Some(v) => println!("{}", serde_json::to_string_pretty(&v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Init { force } => {
            let path = target_path(explicit)?;

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {:?}. Use --force to overwrite.",
                    path
                );
            }

            Config::default().save(&path)?;
            println!("Created config file: {:?}", path);
            println!("  Tip: set OPENAI_API_KEY in the environment or a .env file.");
        }

        ConfigCommand::Path => {
            println!("{}", target_path(explicit)?.display());
        }

        ConfigCommand::Validate => {
            Config::resolve(explicit)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}

fn target_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    Ok(match explicit {
        Some(path) => paths::expand_tilde(path),
        None => paths::config_file()?,
    })
}

/// Value at a dot-separated key path.
fn lookup(config: &Config, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let json = serde_json::to_value(config)?;
    Ok(key
        .split('.')
        .try_fold(&json, |acc, k| acc.get(k))
        .cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_nested_key() {
        let config = Config::default();
        assert_eq!(
            lookup(&config, "server.port").unwrap(),
            Some(serde_json::json!(8000))
        );
        assert_eq!(lookup(&config, "server.missing").unwrap(), None);
    }

    #[test]
    fn test_init_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockwise.json5");

        let args = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        run(args, Some(&path)).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.port, 8000);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockwise.json5");
        std::fs::write(&path, "{}").unwrap();

        let args = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        assert!(run(args, Some(&path)).is_err());

        let args = ConfigArgs {
            command: ConfigCommand::Init { force: true },
        };
        run(args, Some(&path)).unwrap();
        assert!(Config::load(&path).unwrap().openai.api_key.is_none());
    }
}
