// SPDX-License-Identifier: Apache-2.0

use super::errors::DecodeError;
use base64::{self, engine::general_purpose, Engine as _};

/// decodes bytes from a base64url-encoded (unpadded) token segment
pub fn decode_segment(v: &str) -> Result<Vec<u8>, DecodeError> {
    general_purpose::URL_SAFE_NO_PAD
        .decode(v)
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))
}

/// encodes bytes as an unpadded base64url token segment
pub fn encode_segment(v: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(v)
}

/// decodes bytes from a standard base64 string, as used by the `x5c` header
/// certificates and by in-payload binary claims
pub fn decode_std(v: &str) -> Result<Vec<u8>, DecodeError> {
    general_purpose::STANDARD
        .decode(v)
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))
}
