// SPDX-License-Identifier: Apache-2.0

use super::errors::SignatureError;
use super::jws::Algorithm;
use openssl::bn::BigNum;
use openssl::ecdsa::EcdsaSig;
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::pkey::{Id, PKeyRef, Public};
use openssl::sign::Verifier;

impl From<ErrorStack> for SignatureError {
    fn from(e: ErrorStack) -> Self {
        SignatureError::Invalid(e.to_string())
    }
}

/// Verify the token signature under `key` using exactly `alg`.
///
/// The signed material is the ASCII concatenation of the base64url header
/// and payload segments as received (`protected || '.' || payload`), never
/// the decoded bytes.  The key type must match the declared algorithm; a
/// mismatch is a verification failure, not a fallback.
pub fn verify(
    protected: &str,
    payload: &str,
    signature: &[u8],
    key: &PKeyRef<Public>,
    alg: Algorithm,
) -> Result<(), SignatureError> {
    let mut signing_input = Vec::with_capacity(protected.len() + payload.len() + 1);
    signing_input.extend_from_slice(protected.as_bytes());
    signing_input.push(b'.');
    signing_input.extend_from_slice(payload.as_bytes());

    match alg {
        Algorithm::Rs256 => {
            if key.id() != Id::RSA {
                return Err(SignatureError::Invalid(format!(
                    "RS256 requires an RSA key, got {:?}",
                    key.id()
                )));
            }
            verify_digest(&signing_input, signature, key)
        }
        Algorithm::Es256 => {
            if key.id() != Id::EC {
                return Err(SignatureError::Invalid(format!(
                    "ES256 requires an EC key, got {:?}",
                    key.id()
                )));
            }
            let der = jose_sig_to_der(signature)?;
            verify_digest(&signing_input, &der, key)
        }
    }
}

fn verify_digest(
    signing_input: &[u8],
    signature: &[u8],
    key: &PKeyRef<Public>,
) -> Result<(), SignatureError> {
    let mut verifier = Verifier::new(MessageDigest::sha256(), key)?;
    verifier.update(signing_input)?;

    if verifier.verify(signature)? {
        Ok(())
    } else {
        Err(SignatureError::Invalid(
            "signature does not match signing input".to_string(),
        ))
    }
}

/// JOSE encodes ECDSA signatures as the fixed-width concatenation r||s,
/// while OpenSSL expects a DER SEQUENCE of the two integers.
fn jose_sig_to_der(signature: &[u8]) -> Result<Vec<u8>, SignatureError> {
    if signature.len() != 64 {
        return Err(SignatureError::Invalid(format!(
            "ES256 signature must be 64 bytes, got {}",
            signature.len()
        )));
    }

    let r = BigNum::from_slice(&signature[..32])?;
    let s = BigNum::from_slice(&signature[32..])?;

    Ok(EcdsaSig::from_private_components(r, s)?.to_der()?)
}
