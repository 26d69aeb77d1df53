// Copyright (c) 2024 Botho Foundation

//! Sensor reading records and the vocabulary stored in them.
//!
//! A record keeps every field as text. Peer votes are carried verbatim, so a
//! peer sending something other than `accept`/`reject` is still recorded
//! exactly as received. [`Decision`] and [`Outcome`] give typed access to the
//! values this crate itself writes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker for fields that have not been evaluated
pub const NONE: &str = "none";

/// One ledger entry.
///
/// The serialized field names are the ones used by ledgers written before
/// this crate existed (`temp`, `peer0`, `peer1`, `peer2`, `resp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Reading as supplied, decimal text
    #[serde(rename = "temp")]
    pub temperature: String,

    /// This ledger's own tolerance verdict
    #[serde(rename = "peer0")]
    pub local_decision: String,

    /// Vote from the first external peer
    #[serde(rename = "peer1")]
    pub peer_vote1: String,

    /// Vote from the second external peer
    #[serde(rename = "peer2")]
    pub peer_vote2: String,

    /// Reconciled group result
    #[serde(rename = "resp")]
    pub outcome: String,
}

impl SensorRecord {
    /// Blank record written at sequence 0 when the ledger is seeded
    pub fn placeholder() -> Self {
        Self {
            temperature: "0".to_string(),
            local_decision: NONE.to_string(),
            peer_vote1: NONE.to_string(),
            peer_vote2: NONE.to_string(),
            outcome: NONE.to_string(),
        }
    }

    /// Typed local decision, `None` if the stored text is not recognised
    pub fn decision(&self) -> Option<Decision> {
        self.local_decision.parse().ok()
    }

    /// Typed outcome, `None` if the stored text is not recognised
    pub fn outcome_kind(&self) -> Option<Outcome> {
        self.outcome.parse().ok()
    }
}

/// Error for text that is not a known decision or outcome
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognised value {0:?}")]
pub struct UnknownValue(pub String);

/// A single party's verdict on a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Accept,
    Reject,
    /// Not evaluated (seed record)
    None,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::None => NONE,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            NONE => Ok(Self::None),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Reconciled result of the local decision and both peer votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// All three votes agree
    Successful,
    /// Neither peer agrees with the local decision
    UnsuccessfulPeer0,
    /// Peer 1 is the dissenter
    UnsuccessfulPeer1,
    /// Peer 2 is the dissenter
    UnsuccessfulPeer2,
    /// Not evaluated (seed record)
    None,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Successful => "successful",
            Self::UnsuccessfulPeer0 => "unsuccessful-peer0",
            Self::UnsuccessfulPeer1 => "unsuccessful-peer1",
            Self::UnsuccessfulPeer2 => "unsuccessful-peer2",
            Self::None => NONE,
        }
    }

    /// Whether the votes disagreed
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::UnsuccessfulPeer0 | Self::UnsuccessfulPeer1 | Self::UnsuccessfulPeer2
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "successful" => Ok(Self::Successful),
            "unsuccessful-peer0" => Ok(Self::UnsuccessfulPeer0),
            "unsuccessful-peer1" => Ok(Self::UnsuccessfulPeer1),
            "unsuccessful-peer2" => Ok(Self::UnsuccessfulPeer2),
            NONE => Ok(Self::None),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_fields() {
        let record = SensorRecord::placeholder();
        assert_eq!(record.temperature, "0");
        assert_eq!(record.decision(), Some(Decision::None));
        assert_eq!(record.outcome_kind(), Some(Outcome::None));
        assert_eq!(record.peer_vote1, "none");
        assert_eq!(record.peer_vote2, "none");
    }

    #[test]
    fn test_outcome_text_roundtrip() {
        for outcome in [
            Outcome::Successful,
            Outcome::UnsuccessfulPeer0,
            Outcome::UnsuccessfulPeer1,
            Outcome::UnsuccessfulPeer2,
            Outcome::None,
        ] {
            assert_eq!(outcome.as_str().parse::<Outcome>(), Ok(outcome));
        }
    }

    #[test]
    fn test_only_unsuccessful_outcomes_are_faults() {
        assert!(!Outcome::Successful.is_fault());
        assert!(!Outcome::None.is_fault());
        assert!(Outcome::UnsuccessfulPeer0.is_fault());
        assert!(Outcome::UnsuccessfulPeer1.is_fault());
        assert!(Outcome::UnsuccessfulPeer2.is_fault());
    }

    #[test]
    fn test_unknown_vote_text() {
        let record = SensorRecord {
            local_decision: "maybe".to_string(),
            ..SensorRecord::placeholder()
        };
        assert_eq!(record.decision(), None);
        assert_eq!("ACCEPT".parse::<Decision>(), Err(UnknownValue("ACCEPT".to_string())));
    }
}
