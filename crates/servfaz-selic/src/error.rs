//! Error types for servfaz-selic

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`RateError`]
pub type Result<T> = std::result::Result<T, RateError>;

/// Errors that can occur while resolving or applying SELIC rates
#[derive(Debug, Error)]
pub enum RateError {
    /// A date string matched none of the accepted formats
    #[error("Unparseable date: {0}")]
    DateParse(String),

    /// A month key was not of the form YYYY-MM
    #[error("Invalid month key: {0}")]
    InvalidMonth(String),

    /// The remote rate series could not be fetched
    #[error("Rate series fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The rate cache file could not be read or written
    #[error("Rate cache I/O at {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rate cache file held malformed JSON
    #[error("Rate cache format: {0}")]
    CacheFormat(#[from] serde_json::Error),
}
