//! The decaying severity counter for one monitored context.
//!
//! # Recording an incident
//!
//! ```text
//! elapsed   = max(0, now − last_incident)             (backwards clock = no time)
//! cooled    = elapsed / cooldown                      (real-valued)
//! severity  = max(0, severity − ⌊cooled⌋)             (decay first)
//! reported  = severity                                (snapshot)
//! escalate  ⇔ cooled < 1 ∧ (no escalation yet ∨ now − last_escalation > interval)
//! ```
//!
//! Decay is measured from the last *incident*, so a burst after a long quiet
//! spell starts from a fully decayed baseline. Clamping `elapsed` at zero means
//! a clock that steps backwards can never raise severity through a negative
//! floor.

use crate::config::ThrottleConfig;
use crate::error::Result;

/// Result of recording one incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    /// Decayed severity before this incident's increment.
    ///
    /// Only meaningful when `escalated` is true.
    pub severity: u32,
    /// Whether this incident escalated the warning level.
    pub escalated: bool,
}

impl Escalation {
    /// Index into an ordered list of `len` admonishments, clamped to the last.
    ///
    /// Returns `None` for an empty list.
    pub fn message_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.severity as usize).min(len - 1))
    }
}

/// Escalating incident throttle state for one context.
///
/// Not reentrant: mutate it from one place, or behind a lock if events for
/// the same context can arrive concurrently.
#[derive(Debug, Clone)]
pub struct Throttle {
    config: ThrottleConfig,
    severity: u32,
    last_incident: f64,
    /// `None` until the first escalation, which is never debounced.
    last_escalation: Option<f64>,
}

impl Throttle {
    /// Create a throttle at `created_at` (seconds since the Unix epoch).
    ///
    /// Fails if the configuration is invalid, most importantly a
    /// non-positive cooldown.
    pub fn new(config: ThrottleConfig, created_at: f64) -> Result<Self> {
        config.validate()?;
        Ok(Self::new_unchecked(config, created_at))
    }

    /// Construct from a configuration that has already been validated.
    pub(crate) fn new_unchecked(config: ThrottleConfig, created_at: f64) -> Self {
        Self {
            config,
            severity: 0,
            last_incident: created_at,
            last_escalation: None,
        }
    }

    /// Record an incident at `now` and decide whether to escalate.
    pub fn record_incident(&mut self, now: f64) -> Escalation {
        // A clock that stepped backwards counts as no time passing
        let delta = (now - self.last_incident).max(0.0);
        let cooled = delta / self.config.cooldown_seconds;

        let decay = cooled.floor();
        self.severity = if decay >= f64::from(self.severity) {
            0
        } else {
            self.severity - decay as u32
        };

        let reported = self.severity;
        self.last_incident = now;

        let debounced = self
            .last_escalation
            .is_some_and(|last| now - last <= self.config.escalation_interval_seconds);
        let escalated = cooled < 1.0 && !debounced;
        if escalated {
            self.severity = self.severity.saturating_add(1);
            self.last_escalation = Some(now);
            tracing::debug!(severity = reported, now, "incident escalated");
        } else {
            tracing::trace!(severity = reported, cooled, "incident recorded");
        }

        Escalation {
            severity: reported,
            escalated,
        }
    }

    /// Current (undecayed) severity.
    pub fn severity(&self) -> u32 {
        self.severity
    }

    pub fn last_incident(&self) -> f64 {
        self.last_incident
    }

    /// Time of the most recent escalation, if any.
    pub fn last_escalation(&self) -> Option<f64> {
        self.last_escalation
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }
}
