// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::ITrustAnchorStore;
use openssl::x509::X509;
use std::sync::RwLock;

/// The store where the pinned root certificates are stashed.
pub struct MemoTrustAnchorStore {
    p: RwLock<Vec<X509>>,
}

impl Default for MemoTrustAnchorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoTrustAnchorStore {
    /// Returns a new empty TrustAnchorStore
    pub fn new() -> Self {
        Self {
            p: Default::default(),
        }
    }

    /// Add to an existing (and possibly empty) TrustAnchorStore the trust
    /// anchors loaded from the given PEM bundle
    pub fn load_pem(&mut self, pem: &str) -> Result<(), Error> {
        let certs =
            X509::stack_from_pem(pem.as_bytes()).map_err(|e| Error::Syntax(e.to_string()))?;

        if certs.is_empty() {
            return Err(Error::Sema("no certificates in PEM bundle".to_string()));
        }

        self.p.write().unwrap().extend(certs);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.p.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.read().unwrap().is_empty()
    }
}

impl ITrustAnchorStore for MemoTrustAnchorStore {
    fn anchors(&self) -> Vec<X509> {
        self.p.read().unwrap().clone()
    }
}
