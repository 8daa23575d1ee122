// SPDX-License-Identifier: Apache-2.0

use crate::token;
use crate::token::{ChainError, DecodeError, SignatureError, ValidationError};

/// Terminal failure reason for one verification attempt.  Pipeline stage
/// errors are carried as-is so the display layer can explain which stage
/// rejected the attempt; the remaining variants cover the stages before a
/// token even exists.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("attestation channel failure: {0}")]
    Transport(String),
    #[error("randomness source exhausted: {0}")]
    Entropy(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<token::Error> for Error {
    fn from(e: token::Error) -> Self {
        match e {
            token::Error::Decode(e) => Error::Decode(e),
            token::Error::Chain(e) => Error::Chain(e),
            token::Error::Signature(e) => Error::Signature(e),
            token::Error::Validation(e) => Error::Validation(e),
        }
    }
}
