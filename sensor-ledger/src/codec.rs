//! JSON encoding of sensor records.
//!
//! Records are stored as a JSON object with string fields in a fixed order,
//! e.g. `{"temp":"20.5","peer0":"accept","peer1":"accept","peer2":"reject","resp":"unsuccessful-peer2"}`.

use thiserror::Error;

use crate::record::SensorRecord;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to encode sensor record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode sensor record: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Canonical byte form of a record
pub fn encode(record: &SensorRecord) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(record).map_err(CodecError::Encode)
}

/// Inverse of [`encode`]
pub fn decode(bytes: &[u8]) -> Result<SensorRecord, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
