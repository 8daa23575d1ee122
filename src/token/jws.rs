// SPDX-License-Identifier: Apache-2.0

use super::base64;
use super::errors::DecodeError;
use serde::Deserialize;

/// Signature algorithm declared in the protected header.  Verification uses
/// exactly the declared algorithm; there is no negotiation or fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Rs256,
    /// ECDSA on P-256 with SHA-256, JOSE (r||s) signature encoding
    Es256,
}

impl Algorithm {
    pub fn parse(v: &str) -> Result<Self, DecodeError> {
        match v {
            "RS256" => Ok(Algorithm::Rs256),
            "ES256" => Ok(Algorithm::Es256),
            x => Err(DecodeError::UnsupportedAlgorithm(x.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Rs256 => "RS256",
            Algorithm::Es256 => "ES256",
        }
    }
}

/// The unparsed signed response from the attestor, split into its three
/// segments.  Both the base64url source text and the decoded bytes are kept:
/// the signature is computed over the source text, while header and payload
/// contents are read from the decoded bytes.  Immutable once decoded.
#[derive(Clone, Debug)]
pub struct RawToken {
    /// protected header segment as received (base64url)
    pub protected: String,
    /// payload segment as received (base64url)
    pub payload: String,
    /// signature segment as received (base64url)
    pub signature: String,

    /// decoded protected header bytes
    pub header_bytes: Vec<u8>,
    /// decoded payload bytes
    pub payload_bytes: Vec<u8>,
    /// decoded signature bytes
    pub signature_bytes: Vec<u8>,
}

impl RawToken {
    /// Split a compact serialization into its three segments and decode each
    /// one.  This establishes syntactic well-formedness only and never
    /// evaluates trust.
    pub fn decode(raw: &str) -> Result<RawToken, DecodeError> {
        let segments: Vec<&str> = raw.split('.').collect();

        if segments.len() != 3 {
            return Err(DecodeError::MalformedStructure(format!(
                "expecting 3 segments, got {}",
                segments.len()
            )));
        }

        Ok(RawToken {
            protected: segments[0].to_string(),
            payload: segments[1].to_string(),
            signature: segments[2].to_string(),
            header_bytes: base64::decode_segment(segments[0])?,
            payload_bytes: base64::decode_segment(segments[1])?,
            signature_bytes: base64::decode_segment(segments[2])?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: Option<String>,
    x5c: Option<Vec<String>>,
}

/// Parsed protected header: the declared signature algorithm and the DER
/// certificate chain, leaf first.  The certificate list is never empty.
#[derive(Clone, Debug)]
pub struct DecodedHeader {
    pub alg: Algorithm,
    pub certs: Vec<Vec<u8>>,
}

impl DecodedHeader {
    pub fn decode(bytes: &[u8]) -> Result<DecodedHeader, DecodeError> {
        let raw: RawHeader = serde_json::from_slice(bytes)
            .map_err(|e| DecodeError::MalformedStructure(e.to_string()))?;

        let alg = match raw.alg {
            Some(v) => Algorithm::parse(&v)?,
            None => return Err(DecodeError::MissingField("alg".to_string())),
        };

        let x5c = raw
            .x5c
            .ok_or_else(|| DecodeError::MissingField("x5c".to_string()))?;

        if x5c.is_empty() {
            return Err(DecodeError::MissingField("x5c is empty".to_string()));
        }

        let mut certs = Vec::with_capacity(x5c.len());
        for c in &x5c {
            certs.push(base64::decode_std(c)?);
        }

        Ok(DecodedHeader { alg, certs })
    }
}
