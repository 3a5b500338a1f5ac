//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Second level dispatch keyed by the Command header."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fmt;
use std::sync::Arc;

use courier_envelope::Envelope;

use crate::handler::EnvelopeHandler;
use crate::observer::{
    default_observer, DispatchEvent, DispatchLevel, DispatchObserver, SharedObserver,
};
use crate::table::RouteTable;

/// Configuration of a [`CommandDispatcher`].
///
/// Registering a command twice keeps the last handler.
#[derive(Clone)]
pub struct CommandRoutes {
    table: RouteTable,
    observer: SharedObserver,
}

impl Default for CommandRoutes {
    fn default() -> Self {
        Self {
            table: RouteTable::default(),
            observer: default_observer(),
        }
    }
}

impl CommandRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route envelopes whose `Command` equals `command` to `handler`.
    pub fn on_command_name(
        mut self,
        command: impl AsRef<str>,
        handler: impl EnvelopeHandler + 'static,
    ) -> Self {
        self.table.insert(command, handler);
        self
    }

    /// Merge several command routes.
    pub fn add_handlers<I, K, H>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: EnvelopeHandler + 'static,
    {
        self.table.extend(handlers);
        self
    }

    /// Drop existing command routes and install `handlers`.
    pub fn replace_handlers<I, K, H>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: EnvelopeHandler + 'static,
    {
        self.table.replace(handlers);
        self
    }

    /// Handler for unknown or absent commands. Defaults to doing nothing.
    pub fn fallback(mut self, handler: impl EnvelopeHandler + 'static) -> Self {
        self.table.set_fallback(handler);
        self
    }

    pub fn observed_by(mut self, observer: impl DispatchObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Forget routes and fallback; the observer is kept.
    pub fn clear(mut self) -> Self {
        self.table = RouteTable::default();
        self
    }

    pub fn build(self) -> CommandDispatcher {
        CommandDispatcher {
            table: self.table,
            observer: self.observer,
        }
    }
}

/// Routes command envelopes by their `Command` header.
///
/// Envelopes that carry no command, including envelopes that are not of
/// type `Command` at all, go to the fallback. This table never consults the
/// type level's non-typed handler.
#[derive(Clone)]
pub struct CommandDispatcher {
    table: RouteTable,
    observer: SharedObserver,
}

impl CommandDispatcher {
    pub fn routes() -> CommandRoutes {
        CommandRoutes::new()
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        self.table.keys()
    }

    /// Route `envelope` and return whatever the chosen handler returns.
    pub fn dispatch(&self, envelope: &Envelope) -> anyhow::Result<()> {
        let Some(command) = envelope.command() else {
            self.observer.observe(&DispatchEvent::MissingCommand {
                envelope_id: envelope.id(),
                message_type: envelope.message_type(),
            });
            return self.table.fallback().handle(envelope);
        };

        match self.table.lookup(command) {
            Some(handler) => {
                self.observer.observe(&DispatchEvent::Matched {
                    level: DispatchLevel::Command,
                    envelope_id: envelope.id(),
                    key: command,
                });
                handler.handle(envelope)
            }
            None => {
                self.observer.observe(&DispatchEvent::Unmatched {
                    level: DispatchLevel::Command,
                    envelope_id: envelope.id(),
                    key: command,
                });
                self.table.fallback().handle(envelope)
            }
        }
    }
}

impl EnvelopeHandler for CommandDispatcher {
    fn handle(&self, envelope: &Envelope) -> anyhow::Result<()> {
        self.dispatch(envelope)
    }
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("commands", &self.commands())
            .finish()
    }
}
