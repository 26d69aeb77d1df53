use anyhow::{bail, Result};
use std::path::Path;

use super::open_contract;
use crate::contract::Response;

/// Call a contract function by name and print its payload
pub fn run(config_path: &Path, function: &str, args: &[String]) -> Result<()> {
    let (_, contract) = open_contract(config_path)?;

    match contract.invoke(function, args) {
        Response::Success(payload) => {
            if !payload.is_empty() {
                println!("{}", String::from_utf8_lossy(&payload));
            }
            Ok(())
        }
        Response::Error(message) => bail!("{}", message),
    }
}
