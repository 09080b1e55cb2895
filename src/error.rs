//! Error types for sciweb operations.

use thiserror::Error;

/// Fatal errors. Anything that only affects one element is logged and
/// skipped instead of surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source conversion failed: {0}")]
    SourceConversion(String),

    #[error("invalid options: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
