// Copyright (c) 2024 Botho Foundation

//! Sensor ledger library - a key-ordered ledger of peer-validated
//! temperature readings.
//!
//! Each reading is stored under a sequence key (`TEMP0`, `TEMP1`, ...) together
//! with this ledger's own tolerance verdict, the votes of two external peers
//! and the reconciled outcome. The [`contract::Contract`] type is the
//! invocation surface; the other modules are the pieces it is built from.

#![deny(clippy::print_stdout)]

pub mod codec;
pub mod config;
pub mod contract;
pub mod ledger;
pub mod query;
pub mod record;
pub mod report;
pub mod seed;
pub mod sequence;
pub mod telemetry;
pub mod validation;

// Re-export commands module for CLI binary
pub mod commands;

pub use contract::{Command, Contract, Response};
pub use ledger::{LedgerError, LedgerStore, LmdbStore, MemoryStore, StoreError};
pub use query::{LedgerEntry, ScanRange};
pub use record::{Decision, Outcome, SensorRecord};
pub use sequence::KeyScheme;
