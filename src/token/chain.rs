// SPDX-License-Identifier: Apache-2.0

use super::errors::ChainError;
use super::jws::DecodedHeader;
use crate::store::ITrustAnchorStore;
use openssl::asn1::Asn1Time;
use openssl::error::ErrorStack;
use openssl::nid::Nid;
use openssl::x509::{X509Ref, X509VerifyResult, X509};
use std::cmp::Ordering;

/// A validated trust path from the leaf signing certificate up to (or
/// directly under) a pinned trust anchor.
#[derive(Clone, Debug)]
pub struct CertificateChain {
    certs: Vec<X509>,
}

impl CertificateChain {
    /// The leaf certificate, holder of the token signing key.
    pub fn leaf(&self) -> &X509Ref {
        &self.certs[0]
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}

impl From<ErrorStack> for ChainError {
    fn from(e: ErrorStack) -> Self {
        ChainError::Crypto(e.to_string())
    }
}

/// Validate the certificate chain carried in the token header against the
/// pinned trust anchors, at time `at` (unix seconds).
///
/// The walk is leaf-first: every adjacent pair must link (issuer name match
/// and a signature that verifies under the issuer key), every certificate
/// must be inside its validity window, the last certificate must be a pinned
/// anchor or directly signed by one, and the leaf must carry the expected
/// attestor DNS identity.  This runs before the leaf key is used for
/// anything, so an attacker-supplied chain is rejected before its
/// cryptographic claims are trusted.
pub fn verify(
    header: &DecodedHeader,
    tas: &impl ITrustAnchorStore,
    expected_identity: &str,
    at: i64,
) -> Result<CertificateChain, ChainError> {
    if header.certs.is_empty() {
        return Err(ChainError::BadCertificate(
            "empty certificate list".to_string(),
        ));
    }

    let mut certs: Vec<X509> = Vec::with_capacity(header.certs.len());

    for (i, der) in header.certs.iter().enumerate() {
        let c = X509::from_der(der)
            .map_err(|e| ChainError::BadCertificate(format!("certificate [{i}]: {e}")))?;
        certs.push(c);
    }

    for i in 0..certs.len() - 1 {
        let subject = &certs[i];
        let issuer = &certs[i + 1];

        if issuer.issued(subject) != X509VerifyResult::OK {
            return Err(ChainError::BrokenLink(format!(
                "certificate [{i}] was not issued by certificate [{}]",
                i + 1
            )));
        }

        if !subject.verify(issuer.public_key()?.as_ref())? {
            return Err(ChainError::BrokenLink(format!(
                "signature on certificate [{i}] does not verify under certificate [{}]",
                i + 1
            )));
        }
    }

    let when = Asn1Time::from_unix(at)?;
    for (i, c) in certs.iter().enumerate() {
        if c.not_before().compare(&when)? == Ordering::Greater {
            return Err(ChainError::Expired(format!(
                "certificate [{i}] is not yet valid"
            )));
        }
        if c.not_after().compare(&when)? == Ordering::Less {
            return Err(ChainError::Expired(format!("certificate [{i}] has expired")));
        }
    }

    let last = &certs[certs.len() - 1];

    if !is_anchored(last, tas)? {
        return Err(ChainError::UntrustedRoot);
    }

    check_identity(&certs[0], expected_identity)?;

    Ok(CertificateChain { certs })
}

/// The chain terminator must either be one of the pinned anchors or carry a
/// signature from one.
fn is_anchored(last: &X509Ref, tas: &impl ITrustAnchorStore) -> Result<bool, ChainError> {
    let last_der = last.to_der()?;

    for anchor in tas.anchors() {
        if anchor.to_der()? == last_der {
            return Ok(true);
        }

        if anchor.issued(last) == X509VerifyResult::OK && last.verify(anchor.public_key()?.as_ref())? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Confirm the leaf certificate is issued for the expected attestor
/// identity: any SAN dNSName entry must match, falling back to the subject
/// CN when the certificate carries no SAN.
fn check_identity(leaf: &X509Ref, expected: &str) -> Result<(), ChainError> {
    if let Some(sans) = leaf.subject_alt_names() {
        let mut names = Vec::new();
        for gn in sans.iter() {
            if let Some(dns) = gn.dnsname() {
                if dns_match(dns, expected) {
                    return Ok(());
                }
                names.push(dns.to_string());
            }
        }
        return Err(ChainError::IdentityMismatch(format!(
            "expecting {expected}, leaf names {names:?}"
        )));
    }

    let cn = leaf
        .subject_name()
        .entries_by_nid(Nid::COMMONNAME)
        .next()
        .and_then(|e| e.data().as_utf8().ok().map(|s| s.to_string()))
        .unwrap_or_default();

    if dns_match(&cn, expected) {
        return Ok(());
    }

    Err(ChainError::IdentityMismatch(format!(
        "expecting {expected}, leaf CN {cn:?}"
    )))
}

/// Case-insensitive DNS name match.  A `*.` prefix in the presented name
/// covers exactly one leftmost label.
fn dns_match(presented: &str, expected: &str) -> bool {
    let presented = presented.to_ascii_lowercase();
    let expected = expected.to_ascii_lowercase();

    if let Some(suffix) = presented.strip_prefix("*.") {
        return match expected.split_once('.') {
            Some((label, rest)) => !label.is_empty() && rest == suffix,
            None => false,
        };
    }

    presented == expected
}
