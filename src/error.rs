//! Error types for the kbandits library.

use thiserror::Error;

/// Result type alias for bandit operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Errors that can occur while configuring arms, policies or simulations.
///
/// Numerical edge cases inside the selection formulas (`ln(0)`, division by a
/// zero count) are not errors: policies guard them in place and simply
/// deprioritise the affected arm.
#[derive(Error, Debug)]
pub enum BanditError {
    /// No arms were supplied.
    #[error("no arms available")]
    NoArmsAvailable,

    /// No policies were supplied to a simulator.
    #[error("no policies to simulate")]
    NoPolicies,

    /// A policy was configured for a different number of arms than the arm set.
    #[error("arm count mismatch: expected {expected}, got {got}")]
    ArmCountMismatch { expected: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Malformed simulation configuration document.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BanditError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BanditError::InvalidParameter {
            message: message.into(),
        }
    }
}
