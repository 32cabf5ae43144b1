//! Per-context throttle ownership.
//!
//! Each monitored context (a channel, typically) owns its own [`Throttle`].
//! There is no shared counter: incidents in one context never touch another.

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::ThrottleConfig;
use crate::error::Result;
use crate::throttle::{Escalation, Throttle};

/// Throttles keyed by context.
///
/// A context's throttle is created on its first incident (or by an explicit
/// [`register`](Self::register)) and discarded by [`deregister`](Self::deregister).
#[derive(Debug)]
pub struct ThrottleRegistry<K> {
    config: ThrottleConfig,
    throttles: HashMap<K, Throttle>,
}

impl<K: Eq + Hash + Clone> ThrottleRegistry<K> {
    /// Create an empty registry. The configuration is validated once, here.
    pub fn new(config: ThrottleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            throttles: HashMap::new(),
        })
    }

    /// Start tracking `context` as of `now`.
    ///
    /// Returns false, leaving the existing state alone, if already tracked.
    pub fn register(&mut self, context: K, now: f64) -> bool {
        if self.throttles.contains_key(&context) {
            return false;
        }
        self.throttles
            .insert(context, Throttle::new_unchecked(self.config, now));
        true
    }

    /// Record an incident in `context`, creating its throttle if needed.
    pub fn record_incident(&mut self, context: &K, now: f64) -> Escalation {
        let config = self.config;
        self.throttles
            .entry(context.clone())
            .or_insert_with(|| Throttle::new_unchecked(config, now))
            .record_incident(now)
    }

    /// Stop tracking `context`, returning its final state.
    pub fn deregister(&mut self, context: &K) -> Option<Throttle> {
        self.throttles.remove(context)
    }

    pub fn get(&self, context: &K) -> Option<&Throttle> {
        self.throttles.get(context)
    }

    pub fn contains(&self, context: &K) -> bool {
        self.throttles.contains_key(context)
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.throttles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.throttles.is_empty()
    }
}
