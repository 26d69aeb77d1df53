//! Point lookups and full-range scans over the ledger.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{self, CodecError};
use crate::ledger::{LedgerError, LedgerStore, StoreError};
use crate::record::SensorRecord;
use crate::sequence::KeyScheme;

/// Default exclusive upper sequence bound of a full scan (`TEMP0`..`TEMP999`)
pub const DEFAULT_MAX_SEQUENCE: u64 = 999;

/// A decoded ledger entry as returned by a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: SensorRecord,
}

/// Half-open key range `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRange {
    pub start: String,
    pub end: String,
}

impl ScanRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// From sequence 0 up to (not including) `max_sequence`.
    ///
    /// Keys compare as bytes, so the range also covers longer keys that sort
    /// before the end key, e.g. `TEMP1000` < `TEMP999`.
    pub fn for_scheme(scheme: &KeyScheme, max_sequence: u64) -> Self {
        Self::new(scheme.key_for(0), scheme.key_for(max_sequence))
    }
}

impl Default for ScanRange {
    fn default() -> Self {
        Self::for_scheme(&KeyScheme::default(), DEFAULT_MAX_SEQUENCE)
    }
}

/// Raw bytes stored at `key`; `None` when the key is absent.
pub fn query_one<S: LedgerStore + ?Sized>(store: &S, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
    store.get(key)
}

/// Decoded record at `key`; `None` when the key is absent.
pub fn query_record<S: LedgerStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<SensorRecord>, LedgerError> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
        None => Ok(None),
    }
}

/// Scan `range` and decode every entry, in key order.
///
/// Fails as a whole if the scan fails or any entry does not decode.
pub fn query_all<S: LedgerStore + ?Sized>(
    store: &S,
    range: &ScanRange,
) -> Result<Vec<LedgerEntry>, LedgerError> {
    let raw = store.range_scan(&range.start, &range.end)?;

    let entries = raw
        .into_iter()
        .map(|(key, value)| -> Result<LedgerEntry, LedgerError> {
            let record = codec::decode(&value)?;
            Ok(LedgerEntry { key, record })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        start = %range.start,
        end = %range.end,
        count = entries.len(),
        "Queried ledger range"
    );

    Ok(entries)
}

/// JSON array of `{"Key": ..., "Record": {...}}` objects
pub fn entries_to_json(entries: &[LedgerEntry]) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(entries).map_err(CodecError::Encode)
}
