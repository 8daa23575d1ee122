// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use serde::Deserialize;

/// The caller identity this build expects the attestor to echo back:
/// package name and the SHA-256 digest(s) of the caller's signing
/// certificate(s).  Supplied once at startup, read-only afterwards.
#[serde_with::serde_as]
#[derive(Clone, Deserialize, Debug)]
pub struct CallerIdentity {
    #[serde(rename(deserialize = "package-name"))]
    pub package_name: String,

    /// Each digest is a fixed-size, 32 bytes binary blob, hex encoded.
    /// Every listed digest must be echoed by the attestor for the identity
    /// binding to hold.
    #[serde(rename(deserialize = "certificate-digests"))]
    #[serde_as(as = "Vec<serde_with::hex::Hex>")]
    pub cert_digests: Vec<[u8; 32]>,
}

impl CallerIdentity {
    /// Load the expected caller identity from its JSON configuration.
    pub fn load_json(j: &str) -> Result<Self, Error> {
        let id: CallerIdentity = serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))?;

        if id.package_name.is_empty() {
            return Err(Error::Sema("empty package name".to_string()));
        }

        Ok(id)
    }
}
