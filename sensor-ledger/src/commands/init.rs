use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use super::open_contract;
use crate::config::{ledger_db_path_from_config, Config};
use crate::ledger::LedgerStore;

/// Run the init command
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if Config::exists(config_path) {
        info!("Using existing config at {}", config_path.display());
    } else {
        Config::default().save(config_path)?;
        info!("Config written to {}", config_path.display());
    }

    let (_, contract) = open_contract(config_path)?;
    let seed_key = contract.scheme().key_for(0);

    // Seeding is not guarded by the contract itself
    let existing = contract
        .store()
        .get(&seed_key)
        .context("Failed to read ledger")?;
    if existing.is_some() && !force {
        bail!(
            "Ledger already initialized at {}\nUse --force to overwrite {} with a blank record.",
            ledger_db_path_from_config(config_path).display(),
            seed_key
        );
    }

    if let Some(message) = contract.invoke("initLedger", &[]).message() {
        bail!("Failed to seed ledger: {}", message);
    }

    println!("\nLedger initialized.");
    println!("Config:  {}", config_path.display());
    println!("Ledger:  {}", ledger_db_path_from_config(config_path).display());
    println!("Seeded:  {} (placeholder record)", seed_key);
    println!("\nNext steps:");
    println!("  1. Run 'sensor-ledger create 1 <temperature> <peer-vote1> <peer-vote2>'");
    println!("  2. Run 'sensor-ledger report' to count faults");

    Ok(())
}
