// SPDX-License-Identifier: Apache-2.0

use super::base64;
use super::errors::{DecodeError, ValidationError};
use crate::session::Challenge;
use crate::store::CallerIdentity;
use serde::Deserialize;

/// Default bound on how long after the request a statement timestamp is
/// still accepted.
pub const DEFAULT_FRESHNESS_WINDOW_MS: i64 = 10_000;

/// The attestation payload, deserialized only after the token signature has
/// been verified.  Claims are carried as received; binary claims are
/// standard-base64 text with decoding accessors.  Immutable after
/// construction, trusted only once [`StatementValidator`] also passes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AttestationStatement {
    /// Nonce echoed from the verification request.
    pub nonce: Option<String>,
    /// Time of the attestor's evaluation, unix milliseconds.
    pub timestamp_ms: Option<i64>,
    /// Package name of the caller that submitted the request.
    pub apk_package_name: Option<String>,
    /// SHA-256 digests of the caller's signing certificates.
    pub apk_certificate_digest_sha256: Vec<String>,
    /// SHA-256 digest of the caller binary.
    pub apk_digest_sha256: Option<String>,
    /// The device profile matched a known-good configuration.
    pub cts_profile_match: bool,
    /// The device passed basic integrity checks, even if the profile could
    /// not be matched.
    pub basic_integrity: bool,
    /// Kinds of measurement that contributed to this verdict.
    pub evaluation_type: Option<String>,
    /// Human-readable remediation advice from the attestor.
    pub advice: Option<String>,
}

impl AttestationStatement {
    pub fn decode(payload: &[u8]) -> Result<AttestationStatement, DecodeError> {
        serde_json::from_slice(payload).map_err(|e| DecodeError::MalformedStructure(e.to_string()))
    }

    /// The echoed nonce as bytes.  `None` when the claim is absent or not
    /// valid base64; the validator treats both as a mismatch.
    pub fn nonce_bytes(&self) -> Option<Vec<u8>> {
        base64::decode_std(self.nonce.as_deref()?).ok()
    }

    /// Decoded signing-certificate digests.  Undecodable entries are
    /// dropped, which can only make identity matching fail.
    pub fn cert_digests(&self) -> Vec<Vec<u8>> {
        self.apk_certificate_digest_sha256
            .iter()
            .filter_map(|d| base64::decode_std(d).ok())
            .collect()
    }

    pub fn has_basic_evaluation_type(&self) -> bool {
        self.evaluation_type
            .as_deref()
            .is_some_and(|t| t.contains("BASIC"))
    }

    pub fn has_hardware_backed_evaluation_type(&self) -> bool {
        self.evaluation_type
            .as_deref()
            .is_some_and(|t| t.contains("HARDWARE_BACKED"))
    }
}

/// Applies the semantic trust rules to a cryptographically verified
/// statement: nonce echo, freshness window, and (when the profile matched)
/// caller identity binding.  A valid signature alone proves the attestor
/// said it; these checks prove it said it about this request and this
/// caller.
#[derive(Clone, Debug)]
pub struct StatementValidator {
    expected: CallerIdentity,
    freshness_window_ms: i64,
}

impl StatementValidator {
    pub fn new(expected: CallerIdentity) -> Self {
        Self {
            expected,
            freshness_window_ms: DEFAULT_FRESHNESS_WINDOW_MS,
        }
    }

    pub fn with_freshness_window_ms(mut self, window_ms: i64) -> Self {
        self.freshness_window_ms = window_ms;
        self
    }

    /// All rules are mandatory; the first violation is reported.  The
    /// caller-identity pair is skipped, not failed, when the profile did not
    /// match, because an unmatched device cannot assert caller identity.
    pub fn validate(
        &self,
        statement: &AttestationStatement,
        challenge: &Challenge,
        request_time_ms: i64,
    ) -> Result<(), ValidationError> {
        match statement.nonce_bytes() {
            Some(nonce) if nonce == challenge.value => {}
            _ => return Err(ValidationError::NonceMismatch),
        }

        match statement.timestamp_ms {
            None => {
                return Err(ValidationError::StaleResponse(
                    "statement carries no timestamp".to_string(),
                ))
            }
            Some(ts) if ts < request_time_ms => {
                return Err(ValidationError::StaleResponse(format!(
                    "statement predates the request by {}ms",
                    request_time_ms - ts
                )))
            }
            Some(ts) if ts - request_time_ms > self.freshness_window_ms => {
                return Err(ValidationError::StaleResponse(format!(
                    "statement is {}ms after the request, window is {}ms",
                    ts - request_time_ms,
                    self.freshness_window_ms
                )))
            }
            Some(_) => {}
        }

        if statement.cts_profile_match {
            if statement.apk_package_name.as_deref() != Some(self.expected.package_name.as_str()) {
                return Err(ValidationError::PackageMismatch(format!(
                    "expecting {}, got {:?}",
                    self.expected.package_name, statement.apk_package_name
                )));
            }

            let echoed = statement.cert_digests();
            for want in &self.expected.cert_digests {
                if !echoed.iter().any(|d| d.as_slice() == want.as_slice()) {
                    return Err(ValidationError::CertificateMismatch(format!(
                        "digest {} not echoed by the attestor",
                        hex::encode(want)
                    )));
                }
            }
        }

        Ok(())
    }
}
