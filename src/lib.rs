// SPDX-License-Identifier: Apache-2.0

//! Device integrity attestation token verification.
//!
//! This crate provides an API to decode, verify and appraise device/app
//! integrity attestations delivered as compact signed tokens (JWS): three
//! base64url segments with the signing certificate chain embedded in the
//! protected header.
//!
//! The API allows:
//! * Decoding a compact signed attestation token
//! * Validating the embedded certificate chain against pinned trust anchors
//! * Cryptographically verifying the token signature
//! * Appraising the attestation statement against the originating challenge
//!   and the expected caller identity
//! * Driving repeated verification attempts through a session state machine
//!   whose published result always reflects the most recently initiated
//!   attempt

pub mod session;
pub mod store;
pub mod token;
