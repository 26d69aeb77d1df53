// Copyright (c) 2024 Botho Foundation

//! Invocation surface of the sensor ledger.
//!
//! Callers name a function and pass string arguments, the way a hosting
//! runtime hands them over:
//!
//! | function        | arguments                                   |
//! |-----------------|---------------------------------------------|
//! | `queryTemp`     | key                                         |
//! | `initLedger`    | none                                        |
//! | `createTemp`    | key, temperature, peer vote 1, peer vote 2  |
//! | `queryAllTemps` | none                                        |
//!
//! The name and arguments are resolved into a [`Command`] once, up front.
//! Every failure comes back as [`Response::Error`] carrying a readable
//! message; nothing is retried and nothing panics.

use tracing::{info, warn};

use crate::codec;
use crate::config::Config;
use crate::ledger::{LedgerError, LedgerStore};
use crate::query::{self, LedgerEntry, ScanRange};
use crate::record::SensorRecord;
use crate::seed;
use crate::sequence::KeyScheme;
use crate::validation::Validator;

/// A resolved invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    QueryTemp {
        key: String,
    },
    InitLedger,
    CreateTemp {
        key: String,
        temperature: String,
        peer_vote1: String,
        peer_vote2: String,
    },
    QueryAllTemps,
}

impl Command {
    /// Resolve a function name and its arguments.
    pub fn parse(function: &str, args: &[String]) -> Result<Self, LedgerError> {
        match function {
            "queryTemp" => {
                let [key] = expect_args::<1>(function, args)?;
                Ok(Self::QueryTemp { key })
            }
            "initLedger" => {
                expect_args::<0>(function, args)?;
                Ok(Self::InitLedger)
            }
            "createTemp" => {
                let [key, temperature, peer_vote1, peer_vote2] = expect_args::<4>(function, args)?;
                Ok(Self::CreateTemp {
                    key,
                    temperature,
                    peer_vote1,
                    peer_vote2,
                })
            }
            "queryAllTemps" => {
                expect_args::<0>(function, args)?;
                Ok(Self::QueryAllTemps)
            }
            _ => Err(LedgerError::UnknownFunction(function.to_string())),
        }
    }

    /// Function name this command is invoked by
    pub fn name(&self) -> &'static str {
        match self {
            Self::QueryTemp { .. } => "queryTemp",
            Self::InitLedger => "initLedger",
            Self::CreateTemp { .. } => "createTemp",
            Self::QueryAllTemps => "queryAllTemps",
        }
    }
}

// Existing clients call zero-argument functions with a single empty string,
// so all-empty argument lists count as no arguments there.
fn expect_args<const N: usize>(function: &str, args: &[String]) -> Result<[String; N], LedgerError> {
    let args: &[String] = if N == 0 && args.iter().all(String::is_empty) {
        &[]
    } else {
        args
    };

    <[String; N]>::try_from(args.to_vec()).map_err(|given| LedgerError::ArgumentCount {
        function: function.to_string(),
        expected: N,
        got: given.len(),
    })
}

/// Result of an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success(Vec<u8>),
    Error(String),
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self::Success(payload)
    }

    /// Success without payload
    pub fn empty() -> Self {
        Self::Success(Vec::new())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Error(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error(message) => Some(message),
        }
    }
}

impl From<Result<Vec<u8>, LedgerError>> for Response {
    fn from(result: Result<Vec<u8>, LedgerError>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Sensor ledger bound to a store
pub struct Contract<S> {
    store: S,
    scheme: KeyScheme,
    validator: Validator,
    scan_range: ScanRange,
}

impl<S: LedgerStore> Contract<S> {
    /// Contract with default settings (`TEMP` keys, tolerance 1.1, scan bound 999)
    pub fn new(store: S) -> Self {
        Self::with_config(store, &Config::default())
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        let scheme = config.key_scheme();
        Self {
            store,
            validator: Validator::new(scheme.clone(), &config.validation),
            scan_range: config.scan_range(),
            scheme,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheme(&self) -> &KeyScheme {
        &self.scheme
    }

    pub fn scan_range(&self) -> &ScanRange {
        &self.scan_range
    }

    /// Instantiation hook. Does not touch the ledger; see `initLedger`.
    pub fn init(&self) -> Response {
        Response::empty()
    }

    /// Dispatch a named function with string arguments.
    pub fn invoke(&self, function: &str, args: &[String]) -> Response {
        let result = Command::parse(function, args).and_then(|command| self.execute(command));

        if let Err(e) = &result {
            warn!(function, error = %e, "Invocation failed");
        }
        result.into()
    }

    /// Run a resolved command, returning its payload
    pub fn execute(&self, command: Command) -> Result<Vec<u8>, LedgerError> {
        match command {
            Command::QueryTemp { key } => Ok(query::query_one(&self.store, &key)?.unwrap_or_default()),
            Command::InitLedger => {
                seed::seed(&self.store, &self.scheme)?;
                Ok(Vec::new())
            }
            Command::CreateTemp {
                key,
                temperature,
                peer_vote1,
                peer_vote2,
            } => {
                self.create_temp(&key, &temperature, &peer_vote1, &peer_vote2)?;
                Ok(Vec::new())
            }
            Command::QueryAllTemps => {
                let entries = self.query_all()?;
                Ok(query::entries_to_json(&entries)?)
            }
        }
    }

    /// Evaluate a reading and store the resulting record at `key`.
    ///
    /// The record is written with a single `put` after it is fully built; any
    /// failure before that leaves the ledger untouched. The read of the
    /// previous record and the write are separate store calls, so concurrent
    /// creates on neighbouring keys can interleave.
    pub fn create_temp(
        &self,
        key: &str,
        temperature: &str,
        peer_vote1: &str,
        peer_vote2: &str,
    ) -> Result<SensorRecord, LedgerError> {
        let record = self.validator.evaluate(key, temperature, peer_vote1, peer_vote2, |previous| {
            query::query_record(&self.store, previous)
        })?;

        let bytes = codec::encode(&record)?;
        self.store.put(key, &bytes)?;

        info!(
            key,
            temperature,
            local = %record.local_decision,
            outcome = %record.outcome,
            "Recorded reading"
        );
        Ok(record)
    }

    /// Decoded record at `key`
    pub fn query_record(&self, key: &str) -> Result<Option<SensorRecord>, LedgerError> {
        query::query_record(&self.store, key)
    }

    /// All records in the configured scan range, in key order
    pub fn query_all(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        query::query_all(&self.store, &self.scan_range)
    }
}
