// SPDX-License-Identifier: Apache-2.0

/// Failures raised while ingesting verifier configuration: the PEM trust
/// anchor bundle or the JSON caller identity.
#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// the input does not parse (bad PEM, bad JSON, bad hex)
    #[error("Syntax error: {0}")]
    Syntax(String),
    /// the input parses but is unusable (empty bundle, empty package name)
    #[error("Semantic error: {0}")]
    Sema(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e) | Error::Sema(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
