use anyhow::{anyhow, Context, Result};
use std::path::Path;

use super::open_contract;

/// Show the record stored at one sequence number
pub fn run(config_path: &Path, sequence: &str) -> Result<()> {
    let (_, contract) = open_contract(config_path)?;

    let key = contract.scheme().key_for_text(sequence)?;
    match contract
        .query_record(&key)
        .map_err(|e| anyhow!("Failed to query {}: {}", key, e))?
    {
        Some(record) => {
            let json = serde_json::to_string_pretty(&record).context("Failed to format record")?;
            println!("{}", json);
        }
        None => println!("No record at {}", key),
    }

    Ok(())
}

/// Show every record in the configured scan range
pub fn run_all(config_path: &Path) -> Result<()> {
    let (_, contract) = open_contract(config_path)?;

    let entries = contract
        .query_all()
        .map_err(|e| anyhow!("Failed to scan ledger: {}", e))?;

    let json = serde_json::to_string_pretty(&entries).context("Failed to format records")?;
    println!("{}", json);

    Ok(())
}
