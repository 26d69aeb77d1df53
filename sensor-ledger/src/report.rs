//! Fault summary over ledger entries.
//!
//! A fault is any record whose outcome names a dissenting party. The seed
//! record is not a reading and is left out of the totals.

use serde::Serialize;
use std::fmt;

use crate::query::LedgerEntry;
use crate::record::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FaultReport {
    /// Readings counted (seed excluded)
    pub records: usize,
    /// Readings where the votes disagreed
    pub faults: usize,
    /// Faults attributed to this ledger's own decision
    pub peer0: usize,
    pub peer1: usize,
    pub peer2: usize,
    /// Readings with an outcome this crate does not write
    pub unrecognized: usize,
}

impl FaultReport {
    pub fn from_entries(entries: &[LedgerEntry], seed_key: &str) -> Self {
        let mut report = Self::default();

        for entry in entries.iter().filter(|entry| entry.key != seed_key) {
            report.records += 1;
            match entry.record.outcome_kind() {
                Some(Outcome::UnsuccessfulPeer0) => report.peer0 += 1,
                Some(Outcome::UnsuccessfulPeer1) => report.peer1 += 1,
                Some(Outcome::UnsuccessfulPeer2) => report.peer2 += 1,
                Some(Outcome::Successful) | Some(Outcome::None) => continue,
                None => {
                    report.unrecognized += 1;
                    continue;
                }
            }
            report.faults += 1;
        }

        report
    }

    /// One-line summary, e.g. `Found 2 faults out of 10 records`
    pub fn summary(&self) -> String {
        format!("Found {} faults out of {} records", self.faults, self.records)
    }

    /// Share of readings that were faults, 0.0 for an empty ledger
    pub fn fault_rate(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.faults as f64 / self.records as f64
        }
    }
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        writeln!(f, "  peer0 (local): {}", self.peer0)?;
        writeln!(f, "  peer1:         {}", self.peer1)?;
        write!(f, "  peer2:         {}", self.peer2)?;
        if self.unrecognized > 0 {
            write!(f, "\n  unrecognized:  {}", self.unrecognized)?;
        }
        Ok(())
    }
}
