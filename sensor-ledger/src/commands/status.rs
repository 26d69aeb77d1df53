use anyhow::{Context, Result};
use std::path::Path;

use super::open_contract;
use crate::config::ledger_db_path_from_config;

/// Show configuration and ledger status
pub fn run(config_path: &Path) -> Result<()> {
    let (config, contract) = open_contract(config_path)?;

    let records = contract.store().len().context("Failed to count records")?;
    let seeded = contract
        .query_record(&contract.scheme().key_for(0))
        .context("Failed to read seed record")?
        .is_some();
    let range = contract.scan_range();

    println!();
    println!("=== Sensor Ledger Status ===");
    println!();
    println!("Ledger:");
    println!("  Path: {}", ledger_db_path_from_config(config_path).display());
    println!("  Records: {}", records);
    println!("  Seeded: {}", if seeded { "yes" } else { "no" });
    println!();
    println!("Validation:");
    println!("  Key prefix: {}", config.ledger.key_prefix);
    println!("  Tolerance: {}", config.validation.tolerance);
    println!();
    println!("Query:");
    println!("  Scan range: [{}, {})", range.start, range.end);
    println!();

    Ok(())
}
