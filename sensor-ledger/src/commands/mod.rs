//! CLI command implementations.
//!
//! These modules implement the user-facing CLI commands and legitimately
//! use stdout for output.

#![allow(clippy::print_stdout)]

pub mod create;
pub mod init;
pub mod invoke;
pub mod query;
pub mod report;
pub mod status;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{ledger_db_path_from_config, Config};
use crate::contract::Contract;
use crate::ledger::LmdbStore;

/// Load the config and open the ledger next to it
pub(crate) fn open_contract(config_path: &Path) -> Result<(Config, Contract<LmdbStore>)> {
    let config = Config::load(config_path)
        .context("No config found. Run 'sensor-ledger init' first.")?;

    let ledger_path = ledger_db_path_from_config(config_path);
    let store = LmdbStore::open_with_map_size(&ledger_path, config.map_size_bytes())
        .with_context(|| format!("Failed to open ledger at {}", ledger_path.display()))?;

    let contract = Contract::with_config(store, &config);
    Ok((config, contract))
}
