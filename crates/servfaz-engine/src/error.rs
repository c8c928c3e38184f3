//! Error types for servfaz-engine

use thiserror::Error;

/// Result type alias using [`EngineError`]
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while orchestrating a calculation
#[derive(Debug, Error)]
pub enum EngineError {
    /// Grid addressing, parsing or configuration failure
    #[error(transparent)]
    Core(#[from] servfaz_core::Error),

    /// Rate lookup or correction failure
    #[error(transparent)]
    Rate(#[from] servfaz_selic::RateError),

    /// The external calculation engine failed (unreachable, recompute
    /// error). Fatal: no partial block sequence is ever returned.
    #[error("Calculation engine failure: {0}")]
    Engine(String),

    /// The persistence collaborator rejected a record
    #[error("Result store failure: {0}")]
    Store(String),
}
