//! ---
//! courier_section: "04-transport"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Transport contract and in-process transports."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use courier_envelope::Envelope;

use crate::logging::{log_envelope, EnvelopeDirection};
use crate::transport::{require_recipient, Transport};
use crate::Result;

/// In-memory transport with one FIFO mailbox per recipient.
///
/// Clones share the same mailboxes, so one clone can send while another
/// receives.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    mailboxes: Arc<Mutex<HashMap<String, VecDeque<Envelope>>>>,
}

impl InMemoryTransport {
    /// Create a transport with no mailboxes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest envelope waiting for `recipient`.
    ///
    /// A mailbox is dropped once its last envelope is taken.
    pub fn recv(&self, recipient: &str) -> Option<Envelope> {
        let recipient = recipient.trim();
        let envelope = {
            let mut mailboxes = self.mailboxes.lock();
            let mailbox = mailboxes.get_mut(recipient)?;
            let envelope = mailbox.pop_front();
            if mailbox.is_empty() {
                mailboxes.remove(recipient);
            }
            envelope?
        };
        log_envelope(EnvelopeDirection::Inbound, recipient, &envelope);
        Some(envelope)
    }

    /// Take every envelope waiting for `recipient`, oldest first.
    pub fn drain(&self, recipient: &str) -> Vec<Envelope> {
        let recipient = recipient.trim();
        let drained: Vec<Envelope> = self
            .mailboxes
            .lock()
            .remove(recipient)
            .map(Vec::from)
            .unwrap_or_default();
        for envelope in &drained {
            log_envelope(EnvelopeDirection::Inbound, recipient, envelope);
        }
        drained
    }

    /// Number of envelopes waiting for `recipient`.
    pub fn pending(&self, recipient: &str) -> usize {
        self.mailboxes
            .lock()
            .get(recipient.trim())
            .map_or(0, VecDeque::len)
    }

    /// Recipients with at least one envelope waiting, sorted.
    pub fn recipients(&self) -> Vec<String> {
        let mut recipients: Vec<String> = self.mailboxes.lock().keys().cloned().collect();
        recipients.sort_unstable();
        recipients
    }
}

impl Transport for InMemoryTransport {
    fn send(&self, envelope: &Envelope, recipient: &str) -> Result<()> {
        let recipient = require_recipient(recipient)?;
        log_envelope(EnvelopeDirection::Outbound, recipient, envelope);
        self.mailboxes
            .lock()
            .entry(recipient.to_owned())
            .or_default()
            .push_back(envelope.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use courier_envelope::EnvelopeBuilder;

    use super::*;
    use crate::TransportError;

    fn envelope(id: &str) -> Envelope {
        EnvelopeBuilder::simple()
            .with_id(id)
            .with_sender("billing")
            .build()
            .expect("valid envelope")
    }

    #[test]
    fn mailboxes_are_fifo_per_recipient() {
        let transport = InMemoryTransport::new();
        transport.send(&envelope("a1"), "alice").expect("send");
        transport.send(&envelope("b1"), "bob").expect("send");
        transport.send(&envelope("a2"), "alice").expect("send");

        assert_eq!(transport.pending("alice"), 2);
        assert_eq!(transport.recipients(), ["alice", "bob"]);
        let first = transport.recv("alice").expect("alice has mail");
        assert_eq!(first.id(), "a1");
        let rest: Vec<_> = transport
            .drain("alice")
            .iter()
            .map(|e| e.id().to_owned())
            .collect();
        assert_eq!(rest, ["a2"]);
        assert!(transport.recv("alice").is_none());
        assert!(transport.recv("carol").is_none());
        assert_eq!(transport.pending("bob"), 1);
    }

    #[test]
    fn emptied_mailboxes_are_dropped() {
        let transport = InMemoryTransport::new();
        transport.send(&envelope("a1"), " alice ").expect("send");
        transport.send(&envelope("b1"), "bob").expect("send");
        transport.send(&envelope("b2"), "bob").expect("send");

        assert_eq!(transport.recv("alice ").map(|e| e.id().to_owned()).as_deref(), Some("a1"));
        assert_eq!(transport.recipients(), ["bob"]);
        assert_eq!(transport.drain(" bob").len(), 2);
        assert!(transport.recipients().is_empty());
        assert!(transport.drain("bob").is_empty());
    }

    #[test]
    fn blank_recipient_is_rejected() {
        let transport = InMemoryTransport::new();
        let err = transport.send(&envelope("a1"), "").expect_err("blank");
        assert!(matches!(err, TransportError::MissingRecipient));
        assert!(transport.recipients().is_empty());
    }

    #[test]
    fn clones_share_mailboxes_across_threads() {
        let transport = InMemoryTransport::new();
        let sender = transport.clone();
        thread::spawn(move || {
            for n in 0..3 {
                sender
                    .send(&envelope(&format!("m{n}")), "worker")
                    .expect("send");
            }
        })
        .join()
        .expect("sender thread");
        assert_eq!(transport.drain("worker").len(), 3);
    }
}
