use lmdb::{Cursor, Database, DatabaseFlags, Environment, EnvironmentFlags, Transaction, WriteFlags};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::{LedgerStore, StoreError};

/// Name of the LMDB database holding sensor records
pub const RECORDS_DB_NAME: &str = "records";

/// Default LMDB map size (64MB)
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// LMDB-backed ledger storage
pub struct LmdbStore {
    env: Environment,
    /// records: sequence key (UTF-8) -> encoded SensorRecord
    records_db: Database,
}

impl LmdbStore {
    /// Open or create a ledger at the given directory
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    /// Open or create a ledger with an explicit LMDB map size in bytes.
    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, StoreError> {
        fs::create_dir_all(path)?;

        let env = Environment::new()
            .set_flags(EnvironmentFlags::NO_SUB_DIR)
            .set_max_dbs(1)
            .set_map_size(map_size)
            .open(&path.join("ledger.mdb"))?;

        let records_db = env.create_db(Some(RECORDS_DB_NAME), DatabaseFlags::empty())?;

        info!(path = %path.display(), map_size, "Opened ledger store");

        Ok(Self { env, records_db })
    }

    /// Number of records currently stored
    pub fn len(&self) -> Result<usize, StoreError> {
        let txn = self.env.begin_ro_txn()?;
        let mut count = 0;
        {
            let mut cursor = txn.open_ro_cursor(self.records_db)?;
            for item in cursor.iter_start() {
                item?;
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl LedgerStore for LmdbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        // LMDB rejects zero-length keys, so nothing can be stored there
        if key.is_empty() {
            return Ok(None);
        }

        let txn = self.env.begin_ro_txn()?;

        let value = match txn.get(self.records_db, &key) {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.records_db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;

        debug!(key, bytes = value.len(), "Stored record");
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let mut entries = Vec::new();
        if start >= end {
            return Ok(entries);
        }

        let txn = self.env.begin_ro_txn()?;
        {
            let mut cursor = txn.open_ro_cursor(self.records_db)?;
            for item in cursor.iter_from(start) {
                let (key, value) = item?;
                if key >= end.as_bytes() {
                    break;
                }
                let key = std::str::from_utf8(key).map_err(|_| StoreError::InvalidKey)?;
                entries.push((key.to_owned(), value.to_vec()));
            }
        }

        debug!(start, end, count = entries.len(), "Range scan complete");
        Ok(entries)
    }
}
