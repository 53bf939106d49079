//! Error types for Horizon Select core.

use thiserror::Error;

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
    /// A repeating timer was requested with a zero interval.
    #[error("Repeating timer interval must be non-zero")]
    ZeroInterval,
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("Invalid or disconnected connection ID")]
    InvalidConnection,
    /// The signal has been dropped and is no longer available.
    #[error("Signal has been dropped")]
    SignalDropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(TimerError::InvalidTimerId.to_string(), "Invalid or expired timer ID");
        assert_eq!(SignalError::SignalDropped.to_string(), "Signal has been dropped");
    }
}
