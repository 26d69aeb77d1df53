// Copyright (c) 2024 Botho Foundation

//! Tracing subscriber setup for the command-line binary.
//!
//! The filter comes from, in order: `RUST_LOG`, `--verbose` (debug), or the
//! `[logging] filter` entry of the config file.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Build the filter directive for the given settings
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.filter.clone()
    }
}

/// Initialize console logging. Call once, at startup.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(config, verbose))
            .with_context(|| format!("Invalid log filter {:?}", config.filter))?,
    };

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
