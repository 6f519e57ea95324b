//! Error taxonomy for ingestion and reconciliation
//!
//! Consistency findings (score mismatches, duplicate events) are not errors;
//! they are collected into the reconciliation report instead.

use std::path::PathBuf;

use thiserror::Error;

pub type EtlResult<T> = Result<T, EtlError>;

#[derive(Debug, Error)]
pub enum EtlError {
    /// Empty or malformed response where data was required
    #[error("source error from {endpoint}: {message}")]
    Source {
        endpoint: &'static str,
        message: String,
    },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode source response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EtlError {
    pub fn source_error(endpoint: &'static str, message: impl Into<String>) -> Self {
        EtlError::Source {
            endpoint,
            message: message.into(),
        }
    }
}
