// SPDX-License-Identifier: Apache-2.0

//! The token module provides an [`Evidence`] object encapsulating the
//! decode-verify pipeline for a compact signed attestation token, plus the
//! [`StatementValidator`] that appraises a verified statement against the
//! originating challenge and expected caller identity.
//!
//! # Example
//!
//! The following example assumes `attestation.jws` holds a compact
//! serialized token and `anchors.pem` the pinned root certificates.
//!
//! ```no_run
//! use jwstoken::store::MemoTrustAnchorStore;
//! use jwstoken::token::Evidence;
//!
//! let token = std::fs::read_to_string("attestation.jws").unwrap();
//! let evidence = Evidence::decode(&token).expect("decoding attestation token");
//!
//! let pem = std::fs::read_to_string("anchors.pem").unwrap();
//! let mut tas = MemoTrustAnchorStore::new();
//! tas.load_pem(&pem).expect("loading trust anchors");
//!
//! // walk the certificate chain to a pinned anchor, verify the token
//! // signature under the leaf key, then parse the payload
//! let statement = evidence
//!     .verify(&tas, "attest.android.com", 1_724_900_000_000)
//!     .expect("verifying attestation token");
//!
//! println!("basic integrity: {}", statement.basic_integrity);
//! ```

pub use self::chain::CertificateChain;
pub use self::errors::{ChainError, DecodeError, Error, SignatureError, ValidationError};
pub use self::evidence::Evidence;
pub use self::jws::{Algorithm, DecodedHeader, RawToken};
pub use self::statement::{AttestationStatement, StatementValidator, DEFAULT_FRESHNESS_WINDOW_MS};

pub(crate) mod base64;
pub mod chain;
mod errors;
mod evidence;
mod jws;
pub mod signature;
mod statement;
#[cfg(test)]
pub(crate) mod testutil;
