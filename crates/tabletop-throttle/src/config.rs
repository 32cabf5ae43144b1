//! Throttle configuration.

use crate::error::{Result, ThrottleError};

/// Default seconds for one severity unit to decay.
pub const DEFAULT_COOLDOWN_SECONDS: f64 = 300.0;

/// Default minimum spacing between two escalations.
pub const DEFAULT_ESCALATION_INTERVAL_SECONDS: f64 = 30.0;

/// Fixed configuration shared by every throttle in a registry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThrottleConfig {
    /// Time for one severity unit to decay. Must be > 0.
    pub cooldown_seconds: f64,
    /// Minimum time between escalations. Must be >= 0.
    pub escalation_interval_seconds: f64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            escalation_interval_seconds: DEFAULT_ESCALATION_INTERVAL_SECONDS,
        }
    }
}

impl ThrottleConfig {
    pub fn new(cooldown_seconds: f64, escalation_interval_seconds: f64) -> Self {
        Self {
            cooldown_seconds,
            escalation_interval_seconds,
        }
    }

    /// Reject configurations the decay arithmetic cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.cooldown_seconds.is_finite() {
            return Err(ThrottleError::NonFinite {
                field: "cooldown_seconds",
                value: self.cooldown_seconds,
            });
        }
        if !self.escalation_interval_seconds.is_finite() {
            return Err(ThrottleError::NonFinite {
                field: "escalation_interval_seconds",
                value: self.escalation_interval_seconds,
            });
        }
        if self.cooldown_seconds <= 0.0 {
            return Err(ThrottleError::NonPositiveCooldown(self.cooldown_seconds));
        }
        if self.escalation_interval_seconds < 0.0 {
            return Err(ThrottleError::NegativeInterval(
                self.escalation_interval_seconds,
            ));
        }
        Ok(())
    }
}
