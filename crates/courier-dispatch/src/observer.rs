//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Routing events and their observers."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Routing decisions surface as [`DispatchEvent`]s handed to a
//! [`DispatchObserver`]. Anomalies such as a command message without a
//! `Command` header never fail dispatch; they are only reported here.
use std::fmt;
use std::sync::Arc;

use courier_envelope::PayloadDecodingError;
use tracing::{debug, warn};

/// Which dispatch table made a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchLevel {
    /// Keyed by `Message-Type`.
    Type,
    /// Keyed by `Command`.
    Command,
}

impl DispatchLevel {
    /// Lower-case label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Command => "command",
        }
    }
}

impl fmt::Display for DispatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the dispatch layer decided about one envelope.
#[derive(Debug, Clone, Copy)]
pub enum DispatchEvent<'a> {
    /// `key` had a registered handler.
    Matched {
        /// Table that matched.
        level: DispatchLevel,
        /// Envelope being routed.
        envelope_id: &'a str,
        /// Header value used for the lookup.
        key: &'a str,
    },
    /// `key` had no handler; the table default ran.
    Unmatched {
        /// Table that missed.
        level: DispatchLevel,
        /// Envelope being routed.
        envelope_id: &'a str,
        /// Header value used for the lookup.
        key: &'a str,
    },
    /// No `Message-Type` header; the non-typed handler ran.
    NonTyped {
        /// Envelope being routed.
        envelope_id: &'a str,
    },
    /// A command table received an envelope without a command.
    MissingCommand {
        /// Envelope being routed.
        envelope_id: &'a str,
        /// Declared message type, if any.
        message_type: Option<&'a str>,
    },
    /// `Content-Type` names another codec; decoding was skipped.
    ContentTypeMismatch {
        /// Envelope being decoded.
        envelope_id: &'a str,
        /// Tag of the bound decoder.
        expected: &'a str,
        /// Tag carried by the envelope.
        found: &'a str,
    },
    /// No `Content-Type` header; decoding is attempted anyway.
    MissingContentType {
        /// Envelope being decoded.
        envelope_id: &'a str,
        /// Tag of the bound decoder.
        expected: &'a str,
    },
    /// The decoder rejected the payload; the fallback ran.
    DecodeFailed {
        /// Envelope being decoded.
        envelope_id: &'a str,
        /// Decoder error.
        error: &'a PayloadDecodingError,
    },
    /// The payload decoded and the continuation is about to run.
    Decoded {
        /// Envelope being decoded.
        envelope_id: &'a str,
        /// Tag of the decoder that succeeded.
        content_type: &'a str,
    },
}

impl<'a> DispatchEvent<'a> {
    /// Id of the envelope concerned.
    pub fn envelope_id(&self) -> &'a str {
        match *self {
            Self::Matched { envelope_id, .. }
            | Self::Unmatched { envelope_id, .. }
            | Self::NonTyped { envelope_id }
            | Self::MissingCommand { envelope_id, .. }
            | Self::ContentTypeMismatch { envelope_id, .. }
            | Self::MissingContentType { envelope_id, .. }
            | Self::DecodeFailed { envelope_id, .. }
            | Self::Decoded { envelope_id, .. } => envelope_id,
        }
    }

    /// Short snake_case label of the outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Matched { .. } => "matched",
            Self::Unmatched { .. } => "unmatched",
            Self::NonTyped { .. } => "non_typed",
            Self::MissingCommand { .. } => "missing_command",
            Self::ContentTypeMismatch { .. } => "content_type_mismatch",
            Self::MissingContentType { .. } => "missing_content_type",
            Self::DecodeFailed { .. } => "decode_failed",
            Self::Decoded { .. } => "decoded",
        }
    }

    /// Whether the event is about payload decoding rather than routing.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::ContentTypeMismatch { .. }
                | Self::MissingContentType { .. }
                | Self::DecodeFailed { .. }
                | Self::Decoded { .. }
        )
    }

    /// Whether the envelope did not look the way its receiver expected.
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            Self::NonTyped { .. }
                | Self::MissingCommand { .. }
                | Self::ContentTypeMismatch { .. }
                | Self::MissingContentType { .. }
                | Self::DecodeFailed { .. }
        )
    }
}

/// Receives routing and decoding events.
pub trait DispatchObserver: Send + Sync {
    /// Called synchronously, before the chosen handler runs.
    fn observe(&self, event: &DispatchEvent<'_>);
}

impl<F> DispatchObserver for F
where
    F: Fn(&DispatchEvent<'_>) + Send + Sync,
{
    fn observe(&self, event: &DispatchEvent<'_>) {
        self(event)
    }
}

/// Observer writing every event to `tracing`.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    warn_on_anomaly: bool,
}

impl TracingObserver {
    /// Observer that logs anomalies at `warn` when `warn_on_anomaly` is set,
    /// and everything else at `debug`.
    pub fn new(warn_on_anomaly: bool) -> Self {
        Self { warn_on_anomaly }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DispatchObserver for TracingObserver {
    fn observe(&self, event: &DispatchEvent<'_>) {
        let escalate = self.warn_on_anomaly && event.is_anomaly();
        match *event {
            DispatchEvent::Matched {
                level,
                envelope_id,
                key,
            }
            | DispatchEvent::Unmatched {
                level,
                envelope_id,
                key,
            } => debug!(
                envelope_id,
                level = level.as_str(),
                key,
                outcome = event.outcome(),
                "envelope routed"
            ),
            DispatchEvent::NonTyped { envelope_id } => {
                if escalate {
                    warn!(envelope_id, "envelope without message type");
                } else {
                    debug!(envelope_id, "envelope without message type");
                }
            }
            DispatchEvent::MissingCommand {
                envelope_id,
                message_type,
            } => {
                if escalate {
                    warn!(envelope_id, ?message_type, "command envelope without command");
                } else {
                    debug!(envelope_id, ?message_type, "command envelope without command");
                }
            }
            DispatchEvent::ContentTypeMismatch {
                envelope_id,
                expected,
                found,
            } => {
                if escalate {
                    warn!(envelope_id, expected, found, "content type mismatch, decode skipped");
                } else {
                    debug!(envelope_id, expected, found, "content type mismatch, decode skipped");
                }
            }
            DispatchEvent::MissingContentType {
                envelope_id,
                expected,
            } => {
                if escalate {
                    warn!(envelope_id, expected, "envelope without content type, decoding anyway");
                } else {
                    debug!(envelope_id, expected, "envelope without content type, decoding anyway");
                }
            }
            DispatchEvent::DecodeFailed { envelope_id, error } => {
                if escalate {
                    warn!(envelope_id, error = %error, "payload decode failed");
                } else {
                    debug!(envelope_id, error = %error, "payload decode failed");
                }
            }
            DispatchEvent::Decoded {
                envelope_id,
                content_type,
            } => debug!(envelope_id, content_type, "payload decoded"),
        }
    }
}

/// Fans every event out to several observers, in registration order.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn DispatchObserver>>,
}

impl ObserverSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `observer` and return the set.
    pub fn with(mut self, observer: impl DispatchObserver + 'static) -> Self {
        self.push(observer);
        self
    }

    /// Add `observer`.
    pub fn push(&mut self, observer: impl DispatchObserver + 'static) {
        self.observers.push(Arc::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl DispatchObserver for ObserverSet {
    fn observe(&self, event: &DispatchEvent<'_>) {
        for observer in &self.observers {
            observer.observe(event);
        }
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

pub(crate) type SharedObserver = Arc<dyn DispatchObserver>;

pub(crate) fn default_observer() -> SharedObserver {
    Arc::new(TracingObserver::default())
}
