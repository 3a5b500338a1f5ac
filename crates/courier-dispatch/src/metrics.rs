//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Prometheus counters for routing and decoding."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use prometheus::{IntCounterVec, Opts, Registry};

use crate::observer::{DispatchEvent, DispatchObserver};

/// Prometheus metric handles for dispatch activity.
///
/// Register once per registry and install as (part of) the observer of
/// every dispatcher and decoder that should be counted.
#[derive(Clone)]
pub struct DispatchMetrics {
    dispatched: IntCounterVec,
    decoded: IntCounterVec,
}

impl DispatchMetrics {
    /// Register dispatch metrics with the provided registry.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let dispatched = IntCounterVec::new(
            Opts::new(
                "courier_dispatch_total",
                "Routing decisions taken by type and command dispatchers",
            ),
            &["level", "outcome"],
        )?;
        let decoded = IntCounterVec::new(
            Opts::new(
                "courier_decode_total",
                "Payload negotiation and decoding outcomes",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(dispatched.clone()))?;
        registry.register(Box::new(decoded.clone()))?;

        Ok(Self {
            dispatched,
            decoded,
        })
    }

    /// Current routing count for a level and outcome.
    pub fn dispatch_count(&self, level: &str, outcome: &str) -> u64 {
        self.dispatched.with_label_values(&[level, outcome]).get()
    }

    /// Current decoding count for an outcome.
    pub fn decode_count(&self, outcome: &str) -> u64 {
        self.decoded.with_label_values(&[outcome]).get()
    }
}

impl DispatchObserver for DispatchMetrics {
    fn observe(&self, event: &DispatchEvent<'_>) {
        let outcome = event.outcome();
        match event {
            DispatchEvent::Matched { level, .. } | DispatchEvent::Unmatched { level, .. } => self
                .dispatched
                .with_label_values(&[level.as_str(), outcome])
                .inc(),
            DispatchEvent::NonTyped { .. } => {
                self.dispatched.with_label_values(&["type", outcome]).inc()
            }
            DispatchEvent::MissingCommand { .. } => self
                .dispatched
                .with_label_values(&["command", outcome])
                .inc(),
            _ => self.decoded.with_label_values(&[outcome]).inc(),
        }
    }
}
