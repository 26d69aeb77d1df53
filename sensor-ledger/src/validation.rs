// Copyright (c) 2024 Botho Foundation

//! Reading validation and peer reconciliation.
//!
//! Each new reading gets two verdicts:
//! - a local decision, comparing it with the reading stored at the previous
//!   sequence number against a fixed tolerance
//! - a group outcome, comparing the local decision with the votes of two
//!   external peers and naming the single dissenter when they disagree
//!
//! Peer votes are taken as given. Nothing here verifies where they came from.

use tracing::debug;

use crate::config::ValidationConfig;
use crate::ledger::LedgerError;
use crate::record::{Decision, Outcome, SensorRecord};
use crate::sequence::KeyScheme;

/// Largest accepted absolute change between consecutive readings
pub const DEFAULT_TOLERANCE: f64 = 1.1;

/// Readings are short decimal strings; differences within this margin of the
/// tolerance count as equal to it.
const COMPARISON_EPSILON: f64 = 1e-9;

/// Rounding slack per unit of reading magnitude, in multiples of `f64::EPSILON`
const MAGNITUDE_ULPS: f64 = 4.0;

/// Computes the decision and outcome for new readings.
#[derive(Debug, Clone)]
pub struct Validator {
    scheme: KeyScheme,
    tolerance: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(KeyScheme::default(), &ValidationConfig::default())
    }
}

impl Validator {
    pub fn new(scheme: KeyScheme, config: &ValidationConfig) -> Self {
        Self {
            scheme,
            tolerance: config.tolerance,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Evaluate a new reading and build the record to store at `new_key`.
    ///
    /// `lookup_previous` fetches and decodes the record at a given key. It is
    /// only called for sequence numbers above 1; sequences 0 and 1 are
    /// always accepted locally.
    ///
    /// A missing or unreadable predecessor fails with
    /// [`LedgerError::Lookup`]; it never defaults to a zero reading.
    pub fn evaluate<F>(
        &self,
        new_key: &str,
        new_temperature: &str,
        peer_vote1: &str,
        peer_vote2: &str,
        lookup_previous: F,
    ) -> Result<SensorRecord, LedgerError>
    where
        F: FnOnce(&str) -> Result<Option<SensorRecord>, LedgerError>,
    {
        let sequence = self.scheme.parse_sequence(new_key)?;

        let local = if sequence <= 1 {
            Decision::Accept
        } else {
            let previous_key = self.scheme.previous_key(new_key)?;
            let previous = lookup_previous(&previous_key)
                .map_err(|e| match e {
                    LedgerError::Codec(err) => LedgerError::Lookup {
                        key: previous_key.clone(),
                        reason: err.to_string(),
                    },
                    other => other,
                })?
                .ok_or_else(|| LedgerError::Lookup {
                    key: previous_key.clone(),
                    reason: "no record at previous sequence".to_string(),
                })?;

            let old = parse_reading(&previous.temperature).ok_or_else(|| LedgerError::Lookup {
                key: previous_key.clone(),
                reason: format!("stored temperature {:?} is not a number", previous.temperature),
            })?;
            let new = parse_reading(new_temperature)
                .ok_or_else(|| LedgerError::InvalidTemperature(new_temperature.to_string()))?;

            self.local_decision(old, new)
        };

        let outcome = reconcile(local.as_str(), peer_vote1, peer_vote2);

        debug!(
            key = new_key,
            sequence,
            local = %local,
            outcome = %outcome,
            "Evaluated reading"
        );

        Ok(SensorRecord {
            temperature: new_temperature.to_string(),
            local_decision: local.as_str().to_string(),
            peer_vote1: peer_vote1.to_string(),
            peer_vote2: peer_vote2.to_string(),
            outcome: outcome.as_str().to_string(),
        })
    }

    /// Tolerance check between consecutive readings.
    ///
    /// A difference equal to the tolerance in decimal terms is accepted. The
    /// comparison margin scales with the magnitude of the readings.
    pub fn local_decision(&self, previous: f64, new: f64) -> Decision {
        let magnitude = previous.abs().max(new.abs()).max(1.0);
        let margin = COMPARISON_EPSILON.max(MAGNITUDE_ULPS * f64::EPSILON * magnitude);

        if (previous - new).abs() - self.tolerance > margin {
            Decision::Reject
        } else {
            Decision::Accept
        }
    }
}

/// Reconcile the local decision with both peer votes.
///
/// When exactly one party disagrees it is named in the outcome. Peer 1 is
/// checked for agreement before peer 2.
pub fn reconcile(local: &str, peer_vote1: &str, peer_vote2: &str) -> Outcome {
    if local == peer_vote1 && local == peer_vote2 {
        Outcome::Successful
    } else if peer_vote1 == local {
        Outcome::UnsuccessfulPeer2
    } else if peer_vote2 == local {
        Outcome::UnsuccessfulPeer1
    } else {
        Outcome::UnsuccessfulPeer0
    }
}

fn parse_reading(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}
