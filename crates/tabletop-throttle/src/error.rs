//! Error types for tabletop-throttle.

use thiserror::Error;

/// Result type for throttle construction.
pub type Result<T> = std::result::Result<T, ThrottleError>;

/// Configuration errors, reported once at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThrottleError {
    /// Cooldown must be strictly positive; it divides elapsed time.
    #[error("cooldown must be positive, got {0}")]
    NonPositiveCooldown(f64),

    /// Escalation interval must not be negative.
    #[error("escalation interval must not be negative, got {0}")]
    NegativeInterval(f64),

    /// A timing field is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}
