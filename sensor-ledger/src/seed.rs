use tracing::info;

use crate::codec;
use crate::ledger::{LedgerError, LedgerStore};
use crate::record::SensorRecord;
use crate::sequence::KeyScheme;

/// Write the placeholder record at sequence 0 and return its key.
///
/// Not guarded: seeding an existing ledger overwrites sequence 0 with the
/// same placeholder. Callers decide whether that is allowed.
pub fn seed<S: LedgerStore + ?Sized>(store: &S, scheme: &KeyScheme) -> Result<String, LedgerError> {
    let key = scheme.key_for(0);
    let bytes = codec::encode(&SensorRecord::placeholder())?;
    store.put(&key, &bytes)?;

    info!(key = %key, "Seeded ledger with placeholder record");
    Ok(key)
}
