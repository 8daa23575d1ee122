// SPDX-License-Identifier: Apache-2.0

use openssl::x509::X509;

/// Read-only access to the pinned trust anchors that terminate a valid
/// certificate chain.  Loaded once at process start; the verification core
/// never mutates it.
pub trait ITrustAnchorStore {
    /// The full pinned anchor set.
    fn anchors(&self) -> Vec<X509>;
}
