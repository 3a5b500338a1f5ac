//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope handlers and dispatch tables."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fmt;
use std::sync::Arc;

use courier_envelope::Envelope;

/// Terminal or intermediate consumer of an envelope.
///
/// Errors are not interpreted by the dispatch layer; they travel back to
/// whoever invoked dispatch.
pub trait EnvelopeHandler: Send + Sync {
    /// Process `envelope`.
    fn handle(&self, envelope: &Envelope) -> anyhow::Result<()>;
}

impl<F> EnvelopeHandler for F
where
    F: Fn(&Envelope) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, envelope: &Envelope) -> anyhow::Result<()> {
        self(envelope)
    }
}

/// Handler that accepts every envelope and does nothing.
pub fn do_nothing(_envelope: &Envelope) -> anyhow::Result<()> {
    Ok(())
}

/// Cloneable handle to one handler instance.
///
/// Register the same `SharedHandler` under several keys when they must
/// share state.
#[derive(Clone)]
pub struct SharedHandler(Arc<dyn EnvelopeHandler>);

impl SharedHandler {
    /// Wrap `handler`.
    pub fn new(handler: impl EnvelopeHandler + 'static) -> Self {
        Self(Arc::new(handler))
    }
}

impl EnvelopeHandler for SharedHandler {
    fn handle(&self, envelope: &Envelope) -> anyhow::Result<()> {
        self.0.handle(envelope)
    }
}

impl fmt::Debug for SharedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedHandler")
    }
}

pub(crate) type BoxedHandler = Arc<dyn EnvelopeHandler>;

pub(crate) fn boxed(handler: impl EnvelopeHandler + 'static) -> BoxedHandler {
    Arc::new(handler)
}
