// SPDX-License-Identifier: Apache-2.0

use super::challenge::ChallengeBuilder;
use super::errors::Error;
use super::rotator::KeyRotator;
use super::unix_time_ms;
use crate::store::ITrustAnchorStore;
use crate::token::{AttestationStatement, Evidence, StatementValidator};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tracing::{debug, warn};

/// The opaque request/response channel to the remote attestor.  Responses
/// may arrive in any order relative to requests, or not at all; delayed
/// responses are caught by the freshness check, not by the channel.
#[async_trait]
pub trait AttestationChannel: Send + Sync {
    /// Submit a challenge under the given credential and return the compact
    /// serialized token.  Any failure before a token is received maps to
    /// [`Error::Transport`].
    async fn attest(&self, challenge: &[u8], credential: &str) -> Result<String, Error>;
}

/// Outcome of a verification attempt, observable by the display layer.
#[derive(Clone, Debug, PartialEq)]
pub enum VerificationResult {
    NotStarted,
    InProgress,
    Succeeded(AttestationStatement),
    Failed(Error),
}

impl VerificationResult {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationResult::Succeeded(_) | VerificationResult::Failed(_)
        )
    }
}

/// Ties a challenge-bearing verification request to its eventual validated
/// result.
///
/// Each call to [`VerificationSession::check`] is one attempt: fresh
/// challenge, next credential in rotation, one channel round-trip, then the
/// decode-verify-appraise pipeline.  The session publishes a single shared
/// [`VerificationResult`]; attempts are tagged with a monotonically
/// increasing id and a completion is applied only while its attempt is
/// still the most recently initiated one, so a late response from a
/// superseded attempt can never overwrite a newer outcome.  Superseded
/// channel calls are not aborted; their results are discarded.
pub struct VerificationSession<C, S> {
    channel: C,
    anchors: S,
    challenges: ChallengeBuilder,
    rotator: KeyRotator,
    validator: StatementValidator,
    attestor_identity: String,
    attempt: AtomicU64,
    result: RwLock<(u64, VerificationResult)>,
}

impl<C, S> VerificationSession<C, S>
where
    C: AttestationChannel,
    S: ITrustAnchorStore,
{
    pub fn new(
        channel: C,
        anchors: S,
        challenges: ChallengeBuilder,
        rotator: KeyRotator,
        validator: StatementValidator,
        attestor_identity: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            anchors,
            challenges,
            rotator,
            validator,
            attestor_identity: attestor_identity.into(),
            attempt: AtomicU64::new(0),
            result: RwLock::new((0, VerificationResult::NotStarted)),
        }
    }

    /// Snapshot of the currently published result.
    pub fn result(&self) -> VerificationResult {
        self.result.read().unwrap().1.clone()
    }

    /// Run one verification attempt to completion and return its outcome.
    /// The returned value is always this attempt's own outcome; the shared
    /// observable result reflects it only while this attempt is still the
    /// most recently initiated one.
    pub async fn check(&self) -> VerificationResult {
        let id = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(attempt = id, "verification attempt started");

        self.publish(id, VerificationResult::InProgress);

        let outcome = match self.run_attempt().await {
            Ok(statement) => VerificationResult::Succeeded(statement),
            Err(e) => {
                debug!(attempt = id, error = %e, "verification attempt failed");
                VerificationResult::Failed(e)
            }
        };

        self.publish(id, outcome.clone());

        outcome
    }

    async fn run_attempt(&self) -> Result<AttestationStatement, Error> {
        let challenge = self.challenges.build()?;
        let credential = self.rotator.next();

        let raw = self.channel.attest(&challenge.value, &credential).await?;

        // purely computational from here on: decode, chain, signature,
        // statement, in strict order
        let evidence = Evidence::decode(&raw).map_err(Error::from)?;
        let statement = evidence
            .verify(&self.anchors, &self.attestor_identity, unix_time_ms())
            .map_err(Error::from)?;

        self.validator
            .validate(&statement, &challenge, challenge.created_at_ms)?;

        Ok(statement)
    }

    fn publish(&self, id: u64, r: VerificationResult) {
        let mut slot = self.result.write().unwrap();

        if id < slot.0 {
            warn!(
                attempt = id,
                current = slot.0,
                "discarding superseded attempt outcome"
            );
            return;
        }

        *slot = (id, r);
    }
}
