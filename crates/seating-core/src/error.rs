//! Configurator error types.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the configurator's own domain logic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfiguratorError {
    /// Two amounts in different currencies were combined.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Currency code not recognised.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Amount is negative, NaN or infinite.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Fee schedule tiers are not strictly ascending or hold negative values.
    #[error("Invalid fee schedule: {0}")]
    InvalidSchedule(String),
}

/// Failures reported by an external collaborator (catalog source or cart
/// service).
///
/// A timeout is reported through this type too, so callers handle it the
/// same way as a transport error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The request could not be sent or the connection failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The payload could not be decoded or violated its shape.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Nothing is known under the requested id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The call did not finish within its bound.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfiguratorError::CurrencyMismatch {
            expected: "USD".to_string(),
            got: "CAD".to_string(),
        };
        assert_eq!(err.to_string(), "Currency mismatch: expected USD, got CAD");

        let err = SourceError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Timed out after 250ms");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: SourceError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SourceError::Malformed(_)));
    }
}
