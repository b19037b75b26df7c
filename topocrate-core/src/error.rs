//! Error types for topocrate

use thiserror::Error;

/// Main error type for topocrate operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A caller-supplied argument is out of range or inconsistent with the others.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The input is geometrically degenerate for the requested operation.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Floating point evaluation could not produce a trustworthy answer.
    #[error("Numeric instability: {0}")]
    NumericInstability(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for topocrate operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand used by parameter checks throughout the workspace
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidParameter(message.into())
    }
}
