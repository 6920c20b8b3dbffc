//! Tracing subscriber setup.

use stockwise_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the configured level, raised by `-v` flags.
pub fn filter_directive(config: &LoggingConfig, verbose: u8) -> String {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    format!("{},hyper=warn,h2=warn,reqwest=warn", level)
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the config.
pub fn init(config: &LoggingConfig, verbose: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwise_core::config::LogLevel;

    #[test]
    fn test_filter_directive() {
        let config = LoggingConfig {
            level: LogLevel::Warn,
            format: LogFormat::Pretty,
        };
        assert!(filter_directive(&config, 0).starts_with("warn,"));
        assert!(filter_directive(&config, 1).starts_with("debug,"));
        assert!(filter_directive(&config, 3).starts_with("trace,"));
    }
}
