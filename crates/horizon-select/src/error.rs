//! Error types for the selection engine.
//!
//! Runtime selection operations never fail: problems such as a stale key or
//! a predicate refusal are absorbed and reported through `tracing` with an
//! [`Absorbed`] reason. Errors are reserved for configuration and snapshot
//! encoding.

use std::fmt;

/// Result type alias for engine construction.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A duration that must be positive was zero.
    #[error("'{name}' must be greater than zero")]
    ZeroDuration { name: &'static str },

    /// A length or speed was negative, zero where disallowed, or not finite.
    #[error("'{name}' must be a finite {expected} number, got {value}")]
    InvalidNumber {
        name: &'static str,
        expected: &'static str,
        value: f32,
    },

    /// The auto-scroll margin fraction was outside `0..0.5`.
    #[error("auto-scroll margin fraction must be in 0..0.5, got {0}")]
    MarginOutOfRange(f32),

    /// A configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn zero_duration(name: &'static str) -> Self {
        Self::ZeroDuration { name }
    }

    pub(crate) fn not_positive(name: &'static str, value: f32) -> Self {
        Self::InvalidNumber {
            name,
            expected: "positive",
            value,
        }
    }

    pub(crate) fn negative(name: &'static str, value: f32) -> Self {
        Self::InvalidNumber {
            name,
            expected: "non-negative",
            value,
        }
    }
}

/// Failure to encode or decode a [`SelectionSnapshot`](crate::model::SelectionSnapshot).
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode selection snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode selection snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Why an operation was silently dropped.
///
/// Only used for diagnostics; callers observe a `false` return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Absorbed {
    /// A key or position no longer resolves in the current content.
    StaleReference,
    /// The selection predicate refused the change.
    PredicateVeto,
    /// No item geometry is available to map the band against.
    GeometryUnavailable,
    /// Pointer events arrived in an order the state machine does not expect.
    UnexpectedEvent,
    /// The operation is not available in the current selection mode.
    ModeMismatch,
}

impl Absorbed {
    pub fn as_str(self) -> &'static str {
        match self {
            Absorbed::StaleReference => "stale reference",
            Absorbed::PredicateVeto => "predicate veto",
            Absorbed::GeometryUnavailable => "geometry unavailable",
            Absorbed::UnexpectedEvent => "unexpected event",
            Absorbed::ModeMismatch => "mode mismatch",
        }
    }
}

impl fmt::Display for Absorbed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
