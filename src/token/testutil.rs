// SPDX-License-Identifier: Apache-2.0

//! Test-only material: freshly generated CA hierarchies and signed compact
//! tokens, so chain and signature tests exercise real cryptography instead
//! of canned byte strings.

use super::base64::encode_segment;
use super::jws::Algorithm;
use base64::{engine::general_purpose, Engine as _};
use hex_literal::hex;
use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::sign::Signer;
use openssl::x509::extension::{BasicConstraints, SubjectAlternativeName};
use openssl::x509::{X509NameBuilder, X509};
use std::sync::atomic::{AtomicU32, Ordering};

/// Fixed verification time (unix seconds) inside every fixture validity
/// window.
pub const AT: i64 = 1_724_900_000;
pub const AT_MS: i64 = AT * 1000;

pub const ATTESTOR: &str = "attest.android.com";
pub const CALLER_PACKAGE: &str = "com.example.attested";
pub const CALLER_DIGEST: [u8; 32] =
    hex!("89a6fc71dbf82b324bb3b17ba531a9cd9a4b9c1999e1eb0c6ba06ba0f2710646");

static SERIAL: AtomicU32 = AtomicU32::new(1);

pub struct ChainFixture {
    pub root: X509,
    pub root_key: PKey<Private>,
    pub inter: X509,
    pub inter_key: PKey<Private>,
    pub leaf: X509,
    pub leaf_key: PKey<Private>,
}

fn rsa_key() -> PKey<Private> {
    PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap()
}

fn ec_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
}

fn make_cert(
    cn: &str,
    san: Option<&str>,
    key: &PKey<Private>,
    issuer: Option<(&X509, &PKey<Private>)>,
    ca: bool,
) -> X509 {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, cn).unwrap();
    let name = name.build();

    let mut b = X509::builder().unwrap();
    b.set_version(2).unwrap();

    let serial = BigNum::from_u32(SERIAL.fetch_add(1, Ordering::Relaxed))
        .unwrap()
        .to_asn1_integer()
        .unwrap();
    b.set_serial_number(&serial).unwrap();

    b.set_subject_name(&name).unwrap();
    match issuer {
        Some((c, _)) => b.set_issuer_name(c.subject_name()).unwrap(),
        None => b.set_issuer_name(&name).unwrap(),
    }
    b.set_pubkey(key).unwrap();

    b.set_not_before(&Asn1Time::from_unix(AT - 86_400).unwrap())
        .unwrap();
    b.set_not_after(&Asn1Time::from_unix(AT + 10 * 365 * 86_400).unwrap())
        .unwrap();

    if ca {
        b.append_extension(BasicConstraints::new().critical().ca().build().unwrap())
            .unwrap();
    }

    if let Some(dns) = san {
        let ext = SubjectAlternativeName::new()
            .dns(dns)
            .build(&b.x509v3_context(issuer.map(|(c, _)| &**c), None))
            .unwrap();
        b.append_extension(ext).unwrap();
    }

    let signer = issuer.map(|(_, k)| k).unwrap_or(key);
    b.sign(signer, MessageDigest::sha256()).unwrap();
    b.build()
}

fn chain_with(keygen: fn() -> PKey<Private>) -> ChainFixture {
    let root_key = keygen();
    let inter_key = keygen();
    let leaf_key = keygen();

    let root = make_cert("Attestation Root R1", None, &root_key, None, true);
    let inter = make_cert(
        "Attestation CA 1",
        None,
        &inter_key,
        Some((&root, &root_key)),
        true,
    );
    let leaf = make_cert(
        ATTESTOR,
        Some(ATTESTOR),
        &leaf_key,
        Some((&inter, &inter_key)),
        false,
    );

    ChainFixture {
        root,
        root_key,
        inter,
        inter_key,
        leaf,
        leaf_key,
    }
}

/// A root -> intermediate -> leaf hierarchy on RSA keys; the leaf carries
/// the attestor DNS identity.
pub fn rsa_chain() -> ChainFixture {
    chain_with(rsa_key)
}

/// Same hierarchy on P-256 keys.
pub fn ec_chain() -> ChainFixture {
    chain_with(ec_key)
}

fn sign_sha256(key: &PKey<Private>, protected: &str, payload: &str) -> Vec<u8> {
    let mut signer = Signer::new(MessageDigest::sha256(), key).unwrap();
    signer.update(protected.as_bytes()).unwrap();
    signer.update(b".").unwrap();
    signer.update(payload.as_bytes()).unwrap();
    signer.sign_to_vec().unwrap()
}

pub fn sign_rs256(key: &PKey<Private>, protected: &str, payload: &str) -> Vec<u8> {
    sign_sha256(key, protected, payload)
}

pub fn sign_es256(key: &PKey<Private>, protected: &str, payload: &str) -> Vec<u8> {
    let der = sign_sha256(key, protected, payload);
    let sig = EcdsaSig::from_der(&der).unwrap();

    let mut jose = sig.r().to_vec_padded(32).unwrap();
    jose.extend_from_slice(&sig.s().to_vec_padded(32).unwrap());
    jose
}

/// Assemble and sign a compact token carrying the given chain (leaf first)
/// and payload text.
pub fn token(chain: &[&X509], alg: Algorithm, leaf_key: &PKey<Private>, payload: &str) -> String {
    let x5c: Vec<String> = chain
        .iter()
        .map(|c| general_purpose::STANDARD.encode(c.to_der().unwrap()))
        .collect();

    let header = serde_json::json!({ "alg": alg.as_str(), "x5c": x5c }).to_string();

    let protected = encode_segment(header.as_bytes());
    let payload = encode_segment(payload.as_bytes());

    let sig = match alg {
        Algorithm::Rs256 => sign_rs256(leaf_key, &protected, &payload),
        Algorithm::Es256 => sign_es256(leaf_key, &protected, &payload),
    };

    format!("{protected}.{payload}.{}", encode_segment(&sig))
}

/// A well-formed statement payload echoing `nonce`, evaluated at `ts_ms`,
/// asserting profile match for the fixture caller identity.
pub fn statement_json(nonce: &[u8], ts_ms: i64) -> String {
    serde_json::json!({
        "nonce": general_purpose::STANDARD.encode(nonce),
        "timestampMs": ts_ms,
        "apkPackageName": CALLER_PACKAGE,
        "apkCertificateDigestSha256": [general_purpose::STANDARD.encode(CALLER_DIGEST)],
        "apkDigestSha256": general_purpose::STANDARD.encode([7u8; 32]),
        "ctsProfileMatch": true,
        "basicIntegrity": true,
        "evaluationType": "BASIC,HARDWARE_BACKED"
    })
    .to_string()
}
