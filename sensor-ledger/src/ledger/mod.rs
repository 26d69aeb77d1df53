// Copyright (c) 2024 Botho Foundation

//! Key-ordered ledger storage.
//!
//! The ledger is a flat key-value space over UTF-8 keys. Everything above
//! this module only needs three operations: a point read, a point write and
//! an ordered half-open range scan. Each call is atomic on its own; callers
//! that combine a read with a later write get no isolation between the two.

mod memory;
mod store;

pub use memory::MemoryStore;
pub use store::LmdbStore;

use thiserror::Error;

use crate::codec::CodecError;
use crate::sequence::KeyFormatError;

/// Errors raised by a ledger store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] lmdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored key is not valid UTF-8")]
    InvalidKey,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by ledger operations at the invocation boundary
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Incorrect number of arguments. Expecting {expected}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid Smart Contract function name.")]
    UnknownFunction(String),

    #[error(transparent)]
    KeyFormat(#[from] KeyFormatError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to read previous record {key}: {reason}")]
    Lookup { key: String, reason: String },

    #[error("Invalid temperature reading {0:?}")]
    InvalidTemperature(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Point get/put and ordered range scan over string keys.
pub trait LedgerStore {
    /// Read the value stored at `key`, `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` at `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// All entries with `start <= key < end`, ascending by key bytes.
    ///
    /// The scan is all-or-nothing: on failure no entries are returned.
    fn range_scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        (**self).range_scan(start, end)
    }
}
