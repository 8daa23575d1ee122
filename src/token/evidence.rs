// SPDX-License-Identifier: Apache-2.0

use super::chain;
use super::errors::{ChainError, Error};
use super::jws::{DecodedHeader, RawToken};
use super::signature;
use super::statement::AttestationStatement;
use crate::store::ITrustAnchorStore;
use tracing::debug;

/// A decoded (but not yet trusted) compact signed attestation token.
///
/// [`Evidence::decode`] establishes syntax only.  [`Evidence::verify`] runs
/// the trust pipeline in fixed order: certificate chain against the pinned
/// anchors, then the token signature under the leaf key, and only then is
/// the payload deserialized into an [`AttestationStatement`].  A failure at
/// any stage stops the pipeline so later stages never observe unvalidated
/// data.
pub struct Evidence {
    pub raw: RawToken,
    pub header: DecodedHeader,
}

impl Evidence {
    pub fn decode(token: &str) -> Result<Evidence, Error> {
        let raw = RawToken::decode(token)?;
        let header = DecodedHeader::decode(&raw.header_bytes)?;

        Ok(Evidence { raw, header })
    }

    /// Verify chain and signature at time `at_ms` (unix milliseconds) and
    /// return the parsed statement.  The statement still needs semantic
    /// appraisal (nonce, freshness, caller identity) before it is trusted;
    /// see [`super::StatementValidator`].
    pub fn verify(
        &self,
        tas: &impl ITrustAnchorStore,
        expected_identity: &str,
        at_ms: i64,
    ) -> Result<AttestationStatement, Error> {
        let chain = chain::verify(&self.header, tas, expected_identity, at_ms / 1000)?;
        debug!(depth = chain.len(), "certificate chain anchored");

        let leaf_key = chain
            .leaf()
            .public_key()
            .map_err(|e| ChainError::Crypto(e.to_string()))?;

        signature::verify(
            &self.raw.protected,
            &self.raw.payload,
            &self.raw.signature_bytes,
            &leaf_key,
            self.header.alg,
        )?;
        debug!(alg = self.header.alg.as_str(), "token signature verified");

        Ok(AttestationStatement::decode(&self.raw.payload_bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoTrustAnchorStore;
    use crate::token::testutil::{ec_chain, rsa_chain, statement_json, token, ATTESTOR, AT_MS};
    use crate::token::{Algorithm, DecodeError, SignatureError};

    fn store_of(root: &openssl::x509::X509) -> MemoTrustAnchorStore {
        let mut tas = MemoTrustAnchorStore::new();
        tas.load_pem(&String::from_utf8(root.to_pem().unwrap()).unwrap())
            .unwrap();
        tas
    }

    #[test]
    fn verify_rs256_token() {
        let f = rsa_chain();
        let tas = store_of(&f.root);

        let t = token(
            &[&f.leaf, &f.inter],
            Algorithm::Rs256,
            &f.leaf_key,
            &statement_json(b"a challenge", AT_MS + 2_000),
        );

        let e = Evidence::decode(&t).unwrap();
        let s = e.verify(&tas, ATTESTOR, AT_MS).unwrap();

        assert_eq!(s.nonce_bytes().unwrap(), b"a challenge");
        assert!(s.cts_profile_match);
        assert!(s.has_hardware_backed_evaluation_type());
    }

    #[test]
    fn verify_es256_token() {
        let f = ec_chain();
        let tas = store_of(&f.root);

        let t = token(
            &[&f.leaf, &f.inter],
            Algorithm::Es256,
            &f.leaf_key,
            &statement_json(b"a challenge", AT_MS + 2_000),
        );

        let e = Evidence::decode(&t).unwrap();

        assert!(e.verify(&tas, ATTESTOR, AT_MS).is_ok());
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let f = rsa_chain();
        let tas = store_of(&f.root);

        let t = token(
            &[&f.leaf, &f.inter],
            Algorithm::Rs256,
            &f.leaf_key,
            &statement_json(b"a challenge", AT_MS + 2_000),
        );

        // swap in a different (validly encoded) payload segment
        let mut parts: Vec<&str> = t.split('.').collect();
        let forged = crate::token::base64::encode_segment(
            statement_json(b"another challenge", AT_MS + 2_000).as_bytes(),
        );
        parts[1] = &forged;
        let t = parts.join(".");

        let e = Evidence::decode(&t).unwrap();
        let r = e.verify(&tas, ATTESTOR, AT_MS);

        assert!(matches!(
            r,
            Err(Error::Signature(SignatureError::Invalid(_)))
        ));
    }

    #[test]
    fn verify_rejects_untrusted_root_before_signature() {
        let f = rsa_chain();
        let other = rsa_chain();
        let tas = store_of(&other.root);

        // deliberately break the signature as well: the chain stage must
        // reject first, so the reported error is the chain's
        let t = token(
            &[&f.leaf, &f.inter],
            Algorithm::Rs256,
            &other.leaf_key,
            &statement_json(b"a challenge", AT_MS + 2_000),
        );

        let e = Evidence::decode(&t).unwrap();
        let r = e.verify(&tas, ATTESTOR, AT_MS);

        assert!(matches!(r, Err(Error::Chain(ChainError::UntrustedRoot))));
    }

    #[test]
    fn verify_rejects_unparseable_payload() {
        let f = rsa_chain();
        let tas = store_of(&f.root);

        let t = token(&[&f.leaf, &f.inter], Algorithm::Rs256, &f.leaf_key, "not json");

        let e = Evidence::decode(&t).unwrap();
        let r = e.verify(&tas, ATTESTOR, AT_MS);

        assert!(matches!(
            r,
            Err(Error::Decode(DecodeError::MalformedStructure(_)))
        ));
    }
}
