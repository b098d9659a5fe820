//! Error types for srl-record.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for srl-record operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for srl-record operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Inconsistent output configuration; raised before anything is written.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A span pointer or a parent chain could not be resolved to a tree node.
    #[error("resolution error: {0}")]
    Resolution(String),

    /// One argument of an instance could not be turned into a record.
    #[error("extraction error at instance {instance}: {reason}")]
    Extraction { instance: String, reason: String },

    /// An attribute was used that the dataset never declared.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A record lacks a value for a declared attribute.
    #[error("record {record} has no value for attribute `{attribute}`")]
    MissingValue { record: usize, attribute: String },

    /// A line of the instance corpus could not be decoded.
    #[error("corpus error at line {line}: {reason}")]
    Corpus { line: usize, reason: String },

    /// A file could not be read or written.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Arrow record file failure.
    #[error("ipc error: {0}")]
    Ipc(#[from] arrow::error::ArrowError),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        Error::Resolution(msg.into())
    }

    /// Wrap any failure of one argument into an extraction error for `instance`.
    pub fn extraction(instance: impl Into<String>, reason: impl ToString) -> Self {
        Error::Extraction {
            instance: instance.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
