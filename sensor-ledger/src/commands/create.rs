use anyhow::{anyhow, Result};
use std::path::Path;

use super::open_contract;

/// Record a new reading at the given sequence number
pub fn run(
    config_path: &Path,
    sequence: &str,
    temperature: &str,
    peer_vote1: &str,
    peer_vote2: &str,
) -> Result<()> {
    let (_, contract) = open_contract(config_path)?;

    let key = contract.scheme().key_for_text(sequence)?;
    let record = contract
        .create_temp(&key, temperature, peer_vote1, peer_vote2)
        .map_err(|e| anyhow!("Failed to record reading at {}: {}", key, e))?;

    println!();
    println!("Recorded {}:", key);
    println!("  Temperature:    {}", record.temperature);
    println!("  Local decision: {}", record.local_decision);
    println!("  Peer votes:     {} / {}", record.peer_vote1, record.peer_vote2);
    println!("  Outcome:        {}", record.outcome);
    println!();

    Ok(())
}
