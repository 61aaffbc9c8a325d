//! Errors raised while loading records and filters.
//!
//! Filter evaluation itself is infallible; only I/O and document decoding can
//! fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{what}: expected {expected}")]
    Shape { what: String, expected: &'static str },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(what: impl Into<String>, source: serde_yaml::Error) -> Self {
        LoadError::Decode {
            what: what.into(),
            source,
        }
    }
}
