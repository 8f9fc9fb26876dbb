//! Subscriber setup
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use anyhow::{anyhow, Result};
use sarsgraph_core::LoggingConfig;
use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber; `RUST_LOG` wins over the config filter
pub(crate) fn init(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;

    let builder = fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
