use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use super::open_contract;
use crate::report::FaultReport;

/// Count faults across the ledger, optionally saving the summary line
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let (_, contract) = open_contract(config_path)?;

    let entries = contract
        .query_all()
        .map_err(|e| anyhow!("Failed to scan ledger: {}", e))?;
    let report = FaultReport::from_entries(&entries, &contract.scheme().key_for(0));

    println!();
    println!("{}", report);
    println!("  fault rate:    {:.1}%", report.fault_rate() * 100.0);
    println!();

    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, report.summary())
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
