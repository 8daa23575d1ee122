// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::unix_time_ms;
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Random prefix length of every challenge, in bytes.
pub const CHALLENGE_ENTROPY_BYTES: usize = 24;

/// A single-use, context-bound random value sent to the attestor.  Never
/// reused across attempts and never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    /// The challenge bytes: CSPRNG prefix, then the decimal request time,
    /// then the device/build fingerprint.
    pub value: Vec<u8>,
    /// Request time, unix milliseconds.  Doubles as the reference point for
    /// the freshness check on the response.
    pub created_at_ms: i64,
    /// The fingerprint this challenge was bound to.
    pub fingerprint: String,
}

/// Produces a fresh challenge per verification attempt, bound to a stable
/// device/build fingerprint so a challenge minted for one context cannot be
/// replayed against another.
#[derive(Clone, Debug)]
pub struct ChallengeBuilder {
    fingerprint: String,
}

impl ChallengeBuilder {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
        }
    }

    /// Build a fresh challenge.  The only failure path is exhaustion of the
    /// OS randomness source, which is fatal for the attempt: without a
    /// trustworthy challenge there is nothing worth verifying.
    pub fn build(&self) -> Result<Challenge, Error> {
        let mut seed = [0u8; CHALLENGE_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| Error::Entropy(e.to_string()))?;

        let created_at_ms = unix_time_ms();

        let mut value = seed.to_vec();
        value.extend_from_slice(created_at_ms.to_string().as_bytes());
        value.extend_from_slice(self.fingerprint.as_bytes());

        Ok(Challenge {
            value,
            created_at_ms,
            fingerprint: self.fingerprint.clone(),
        })
    }
}
