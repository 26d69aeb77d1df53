use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use super::{LedgerStore, StoreError};

/// In-memory ledger storage ordered by key bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored
    pub fn len(&self) -> Result<usize, StoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl LedgerStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        if start >= end {
            return Ok(Vec::new());
        }

        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("TEMP0").unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_range_scan_matches_byte_order() {
        let store = MemoryStore::new();
        for key in ["TEMP2", "TEMP10", "TEMP1", "TEMP0", "TEMP999"] {
            store.put(key, b"v").unwrap();
        }

        let keys: Vec<String> = store
            .range_scan("TEMP0", "TEMP999")
            .unwrap()
            .into_iter()
            .map(|(key, _)| key)
            .collect();

        assert_eq!(keys, vec!["TEMP0", "TEMP1", "TEMP10", "TEMP2"]);
        assert_eq!(store.len().unwrap(), 5);
    }

    #[test]
    fn test_poisoned_lock_is_unavailable() {
        let store = Arc::new(MemoryStore::new());
        store.put("TEMP0", b"v").unwrap();

        let writer = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = writer.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.get("TEMP0"), Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let store = MemoryStore::new();
        store.put("TEMP1", b"v").unwrap();
        assert!(store.range_scan("TEMP9", "TEMP1").unwrap().is_empty());
    }
}
