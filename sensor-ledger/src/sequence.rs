//! Sequence keys: `PREFIX<n>` with `n` a non-negative integer.

use thiserror::Error;

/// Prefix used by ledgers written before this crate existed
pub const DEFAULT_KEY_PREFIX: &str = "TEMP";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFormatError {
    #[error("Key {key:?} does not start with {prefix:?}")]
    MissingPrefix { key: String, prefix: String },

    #[error("Key {0:?} has no sequence number")]
    MissingSequence(String),

    #[error("Invalid sequence number {0:?}: expected a non-negative integer")]
    InvalidSequence(String),

    #[error("Key {0:?} is the first in the sequence and has no predecessor")]
    NoPredecessor(String),
}

/// Maps sequence numbers to ledger keys and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScheme {
    prefix: String,
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl KeyScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Ledger key for sequence number `n`
    pub fn key_for(&self, n: u64) -> String {
        format!("{}{}", self.prefix, n)
    }

    /// Ledger key for a sequence number given as text (e.g. from the command line)
    pub fn key_for_text(&self, text: &str) -> Result<String, KeyFormatError> {
        let n = parse_number(text).ok_or_else(|| KeyFormatError::InvalidSequence(text.to_string()))?;
        Ok(self.key_for(n))
    }

    /// Extract the sequence number from a ledger key
    pub fn parse_sequence(&self, key: &str) -> Result<u64, KeyFormatError> {
        let digits = key
            .strip_prefix(self.prefix.as_str())
            .ok_or_else(|| KeyFormatError::MissingPrefix {
                key: key.to_string(),
                prefix: self.prefix.clone(),
            })?;

        if digits.is_empty() {
            return Err(KeyFormatError::MissingSequence(key.to_string()));
        }
        parse_number(digits).ok_or_else(|| KeyFormatError::InvalidSequence(key.to_string()))
    }

    /// Key of the record immediately before `key`
    pub fn previous_key(&self, key: &str) -> Result<String, KeyFormatError> {
        match self.parse_sequence(key)? {
            0 => Err(KeyFormatError::NoPredecessor(key.to_string())),
            n => Ok(self.key_for(n - 1)),
        }
    }
}

// Plain ASCII digits only: no sign, no whitespace, must fit in u64.
fn parse_number(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
