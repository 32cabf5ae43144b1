//! Tabletop Throttle
//!
//! An escalating warning throttle for recurring incidents, such as repeated
//! off-topic posts in a channel that should stay quiet.
//!
//! # Model
//!
//! Each monitored context carries a severity counter. Incidents arriving
//! faster than the cooldown raise it; quiet time decays it by one unit per
//! cooldown period. Escalations are spaced at least one escalation interval
//! apart, so a burst of incidents yields one warning, not one per message.
//!
//! The first incident always escalates: until a context has escalated once,
//! there is no previous escalation to space it from.
//!
//! # Usage
//!
//! ```
//! use tabletop_throttle::{ThrottleConfig, ThrottleRegistry};
//!
//! let mut registry = ThrottleRegistry::new(ThrottleConfig::new(20.0, 5.0)).unwrap();
//! let first = registry.record_incident(&"general", 1001.0);
//! assert!(first.escalated);
//! assert_eq!(first.severity, 0);
//!
//! let second = registry.record_incident(&"general", 1003.0);
//! assert!(!second.escalated);
//! ```

mod config;
mod error;
mod registry;
mod throttle;

pub use config::{ThrottleConfig, DEFAULT_COOLDOWN_SECONDS, DEFAULT_ESCALATION_INTERVAL_SECONDS};
pub use error::{Result, ThrottleError};
pub use registry::ThrottleRegistry;
pub use throttle::{Escalation, Throttle};
