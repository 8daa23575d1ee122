// SPDX-License-Identifier: Apache-2.0

/// Syntactic failures raised while splitting and decoding a compact signed
/// token.  None of these imply anything about trust.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed token structure: {0}")]
    MalformedStructure(String),
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("missing header field: {0}")]
    MissingField(String),
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Failures raised while validating the embedded certificate chain against
/// the pinned trust anchors.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ChainError {
    #[error("unparseable certificate: {0}")]
    BadCertificate(String),
    #[error("broken chain link: {0}")]
    BrokenLink(String),
    #[error("certificate outside its validity window: {0}")]
    Expired(String),
    #[error("chain does not terminate at a pinned trust anchor")]
    UntrustedRoot,
    #[error("leaf certificate identity mismatch: {0}")]
    IdentityMismatch(String),
    #[error("crypto backend failure: {0}")]
    Crypto(String),
}

/// Failures raised while verifying the token signature.  No partial trust:
/// on failure the payload stays unparsed.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature verification failed: {0}")]
    Invalid(String),
}

/// Failures raised while appraising a cryptographically verified statement
/// against the originating challenge and the expected caller identity.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("statement nonce does not match the challenge")]
    NonceMismatch,
    #[error("statement is outside the freshness window: {0}")]
    StaleResponse(String),
    #[error("caller package mismatch: {0}")]
    PackageMismatch(String),
    #[error("caller signing certificate mismatch: {0}")]
    CertificateMismatch(String),
}

/// Any failure from the decode-verify-appraise pipeline.  Each verification
/// stage maps to exactly one variant, so a caller can tell which stage
/// rejected the token.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
