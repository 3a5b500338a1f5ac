//! ---
//! courier_section: "04-transport"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Transport contract and in-process transports."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use tracing::debug;

use courier_envelope::Envelope;

/// Direction of the envelope movement, used for consistent logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeDirection {
    /// Envelope handed to a transport.
    Outbound,
    /// Envelope taken from a transport.
    Inbound,
}

/// Emit a structured log entry for envelope activity.
pub fn log_envelope(direction: EnvelopeDirection, recipient: &str, envelope: &Envelope) {
    debug!(
        envelope_id = envelope.id(),
        sender = envelope.sender(),
        recipient,
        timestamp = %envelope.timestamp(),
        message_type = envelope.message_type().unwrap_or("-"),
        content_type = envelope.content_type().unwrap_or("-"),
        payload_bytes = envelope.payload().len(),
        direction = ?direction,
        "envelope activity"
    );
}
