//! ---
//! courier_section: "04-transport"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Transport contract and in-process transports."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fmt;

use courier_envelope::{BoxError, Envelope};

use crate::logging::{log_envelope, EnvelopeDirection};
use crate::{Result, TransportError};

/// Transport abstraction implemented by every delivery backend.
pub trait Transport: Send + Sync {
    /// Hand `envelope` over for delivery to `recipient`.
    ///
    /// Implementations reject a blank recipient with
    /// [`TransportError::MissingRecipient`].
    fn send(&self, envelope: &Envelope, recipient: &str) -> Result<()>;

    /// Human-readable transport name for logging.
    fn name(&self) -> &'static str;
}

pub(crate) fn require_recipient(recipient: &str) -> Result<&str> {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        Err(TransportError::MissingRecipient)
    } else {
        Ok(recipient)
    }
}

/// Transport delegating delivery to a closure.
///
/// The closure sees only validated recipients.
pub struct FnTransport<F> {
    deliver: F,
}

impl<F> FnTransport<F>
where
    F: Fn(&Envelope, &str) -> std::result::Result<(), BoxError> + Send + Sync,
{
    /// Wrap `deliver`.
    pub fn new(deliver: F) -> Self {
        Self { deliver }
    }
}

impl<F> Transport for FnTransport<F>
where
    F: Fn(&Envelope, &str) -> std::result::Result<(), BoxError> + Send + Sync,
{
    fn send(&self, envelope: &Envelope, recipient: &str) -> Result<()> {
        let recipient = require_recipient(recipient)?;
        log_envelope(EnvelopeDirection::Outbound, recipient, envelope);
        (self.deliver)(envelope, recipient).map_err(|source| TransportError::Delivery {
            envelope_id: envelope.id().to_owned(),
            recipient: recipient.to_owned(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "fn"
    }
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTransport")
    }
}
