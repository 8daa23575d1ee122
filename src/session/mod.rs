// SPDX-License-Identifier: Apache-2.0

//! The session module drives verification attempts end to end: challenge
//! construction, credential rotation, the round-trip to the external
//! attestation channel, and publication of a single observable
//! [`VerificationResult`] with latest-attempt-wins semantics.
//!
//! # Example
//!
//! ```no_run
//! use jwstoken::session::{
//!     AttestationChannel, ChallengeBuilder, KeyRotator, VerificationSession,
//! };
//! use jwstoken::store::{CallerIdentity, MemoTrustAnchorStore};
//! use jwstoken::token::StatementValidator;
//!
//! # async fn run(channel: impl AttestationChannel) {
//! let mut tas = MemoTrustAnchorStore::new();
//! tas.load_pem(include_str!("../../demos/anchors.pem"))
//!     .expect("loading trust anchors");
//!
//! let caller = CallerIdentity::load_json(include_str!("../../demos/caller.json"))
//!     .expect("loading caller identity");
//!
//! let session = VerificationSession::new(
//!     channel,
//!     tas,
//!     ChallengeBuilder::new("Pixel 8/34/2024-08-05"),
//!     KeyRotator::new(vec!["key-a".into(), "key-b".into()]).unwrap(),
//!     StatementValidator::new(caller),
//!     "attest.android.com",
//! );
//!
//! let result = session.check().await;
//! # }
//! ```

pub use self::challenge::{Challenge, ChallengeBuilder, CHALLENGE_ENTROPY_BYTES};
pub use self::errors::Error;
pub use self::rotator::KeyRotator;
pub use self::verifier::{AttestationChannel, VerificationResult, VerificationSession};

mod challenge;
mod errors;
mod rotator;
mod verifier;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in milliseconds.  A clock before the epoch maps to 0,
/// which downstream freshness checks reject.
pub(crate) fn unix_time_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}
