//! Error types for packing operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a pack operation.
///
/// Every variant is fatal: nothing is retried and no partial output is
/// written once one of these is returned.
#[derive(Error, Debug)]
pub enum PackError {
    /// A glob pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A directory could not be enumerated during traversal.
    #[error("failed to read directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file selected for packing could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The output document could not be written.
    #[error("failed to write output to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PackError {
    pub fn walk(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
