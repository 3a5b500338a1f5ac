//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "First level dispatch keyed by the Message-Type header."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Type level dispatch.
//!
//! Three outcomes are kept apart: a registered type runs its handler, an
//! unregistered type runs the fallback, and an envelope with no
//! `Message-Type` at all runs the non-typed handler. Both defaults do
//! nothing unless configured.
use std::fmt;
use std::sync::Arc;

use courier_envelope::{Envelope, MessageType};

use crate::command::CommandRoutes;
use crate::handler::{boxed, do_nothing, BoxedHandler, EnvelopeHandler};
use crate::observer::{
    default_observer, DispatchEvent, DispatchLevel, DispatchObserver, SharedObserver,
};
use crate::table::RouteTable;

/// Configuration of a [`TypeDispatcher`].
#[derive(Clone)]
pub struct TypeRoutes {
    table: RouteTable,
    non_typed: BoxedHandler,
    observer: SharedObserver,
}

impl Default for TypeRoutes {
    fn default() -> Self {
        Self {
            table: RouteTable::default(),
            non_typed: boxed(do_nothing),
            observer: default_observer(),
        }
    }
}

impl TypeRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route envelopes whose `Message-Type` equals `message_type`.
    ///
    /// Any tag is accepted, not only the built-in [`MessageType`]s.
    pub fn on_type(
        mut self,
        message_type: impl AsRef<str>,
        handler: impl EnvelopeHandler + 'static,
    ) -> Self {
        self.table.insert(message_type, handler);
        self
    }

    pub fn on_simple(self, handler: impl EnvelopeHandler + 'static) -> Self {
        self.on_type(MessageType::Simple, handler)
    }

    pub fn on_reply(self, handler: impl EnvelopeHandler + 'static) -> Self {
        self.on_type(MessageType::Reply, handler)
    }

    pub fn on_command(self, handler: impl EnvelopeHandler + 'static) -> Self {
        self.on_type(MessageType::Command, handler)
    }

    /// Route command envelopes through a command table built from `routes`.
    pub fn with_commands(self, routes: CommandRoutes) -> Self {
        self.on_command(routes.build())
    }

    pub fn add_handlers<I, K, H>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: EnvelopeHandler + 'static,
    {
        self.table.extend(handlers);
        self
    }

    pub fn replace_handlers<I, K, H>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: EnvelopeHandler + 'static,
    {
        self.table.replace(handlers);
        self
    }

    /// Handler for types without a route.
    pub fn fallback(mut self, handler: impl EnvelopeHandler + 'static) -> Self {
        self.table.set_fallback(handler);
        self
    }

    /// Handler for envelopes without a `Message-Type` header.
    pub fn non_typed(mut self, handler: impl EnvelopeHandler + 'static) -> Self {
        self.non_typed = boxed(handler);
        self
    }

    /// Replace the default [`crate::TracingObserver`].
    ///
    /// Command tables installed with [`Self::with_commands`] keep their own
    /// observer.
    pub fn observed_by(mut self, observer: impl DispatchObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Forget routes, fallback and non-typed handler; the observer is kept.
    pub fn clear(mut self) -> Self {
        self.table = RouteTable::default();
        self.non_typed = boxed(do_nothing);
        self
    }

    pub fn build(self) -> TypeDispatcher {
        TypeDispatcher {
            table: self.table,
            non_typed: self.non_typed,
            observer: self.observer,
        }
    }
}

/// Immutable `Message-Type` routing table.
///
/// Cheap to clone and safe to share between threads; nothing is mutated
/// after [`TypeRoutes::build`].
#[derive(Clone)]
pub struct TypeDispatcher {
    table: RouteTable,
    non_typed: BoxedHandler,
    observer: SharedObserver,
}

impl TypeDispatcher {
    pub fn routes() -> TypeRoutes {
        TypeRoutes::new()
    }

    /// Registered type tags, sorted.
    pub fn message_types(&self) -> Vec<&str> {
        self.table.keys()
    }

    /// Route `envelope` and return whatever the chosen handler returns.
    pub fn dispatch(&self, envelope: &Envelope) -> anyhow::Result<()> {
        let Some(message_type) = envelope.message_type() else {
            self.observer.observe(&DispatchEvent::NonTyped {
                envelope_id: envelope.id(),
            });
            return self.non_typed.handle(envelope);
        };

        match self.table.lookup(message_type) {
            Some(handler) => {
                self.observer.observe(&DispatchEvent::Matched {
                    level: DispatchLevel::Type,
                    envelope_id: envelope.id(),
                    key: message_type,
                });
                handler.handle(envelope)
            }
            None => {
                self.observer.observe(&DispatchEvent::Unmatched {
                    level: DispatchLevel::Type,
                    envelope_id: envelope.id(),
                    key: message_type,
                });
                self.table.fallback().handle(envelope)
            }
        }
    }
}

impl EnvelopeHandler for TypeDispatcher {
    fn handle(&self, envelope: &Envelope) -> anyhow::Result<()> {
        self.dispatch(envelope)
    }
}

impl fmt::Debug for TypeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDispatcher")
            .field("message_types", &self.message_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use courier_envelope::EnvelopeBuilder;

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, label: &'static str) -> impl EnvelopeHandler + 'static {
        let log = Arc::clone(log);
        move |_: &Envelope| -> anyhow::Result<()> {
            log.lock().unwrap().push(label.to_owned());
            Ok(())
        }
    }

    fn typed(message_type: &str) -> Envelope {
        EnvelopeBuilder::new()
            .with_sender("test")
            .message_type(message_type)
            .build()
            .unwrap()
    }

    #[test]
    fn exact_match_fallback_and_non_typed_are_distinct() {
        let log = Log::default();
        let dispatcher = TypeRoutes::new()
            .on_type("A", record(&log, "h1"))
            .on_type("B", record(&log, "h2"))
            .fallback(record(&log, "hd"))
            .non_typed(record(&log, "untyped"))
            .build();

        dispatcher.dispatch(&typed("A")).unwrap();
        dispatcher.dispatch(&typed("C")).unwrap();
        dispatcher.dispatch(&typed("a")).unwrap();
        let untyped = EnvelopeBuilder::new().with_sender("test").build().unwrap();
        dispatcher.dispatch(&untyped).unwrap();

        assert_eq!(*log.lock().unwrap(), ["h1", "hd", "hd", "untyped"]);
    }

    #[test]
    fn unconfigured_dispatcher_is_a_no_op() {
        let dispatcher = TypeDispatcher::routes().build();
        assert!(dispatcher.dispatch(&typed("Simple")).is_ok());
        let untyped = EnvelopeBuilder::new().with_sender("test").build().unwrap();
        assert!(dispatcher.dispatch(&untyped).is_ok());
        assert!(dispatcher.message_types().is_empty());
    }

    #[test]
    fn well_known_shortcuts_and_bulk_registration() {
        let log = Log::default();
        let dispatcher = TypeRoutes::new()
            .on_simple(record(&log, "simple"))
            .on_reply(record(&log, "reply"))
            .add_handlers([("Audit", record(&log, "audit"))])
            .build();
        assert_eq!(dispatcher.message_types(), ["Audit", "Reply", "Simple"]);

        let replaced = TypeRoutes::new()
            .on_simple(record(&log, "simple"))
            .replace_handlers([(MessageType::Reply, record(&log, "reply"))])
            .build();
        assert_eq!(replaced.message_types(), ["Reply"]);
    }

    #[test]
    fn command_branch_uses_its_own_default() {
        let log = Log::default();
        let events = Log::default();
        let seen = Arc::clone(&events);
        let dispatcher = TypeRoutes::new()
            .with_commands(
                CommandRoutes::new()
                    .on_command_name("refund", record(&log, "refund"))
                    .fallback(record(&log, "command-default")),
            )
            .fallback(record(&log, "type-default"))
            .non_typed(record(&log, "untyped"))
            .observed_by(move |event: &DispatchEvent<'_>| {
                seen.lock().unwrap().push(event.outcome().to_owned());
            })
            .build();

        let refund = EnvelopeBuilder::command_message("refund")
            .with_sender("test")
            .build()
            .unwrap();
        dispatcher.dispatch(&refund).unwrap();
        dispatcher.dispatch(&typed("Command")).unwrap();

        assert_eq!(*log.lock().unwrap(), ["refund", "command-default"]);
        assert_eq!(*events.lock().unwrap(), ["matched", "matched"]);
    }

    #[test]
    fn clear_drops_routes() {
        let log = Log::default();
        let dispatcher = TypeRoutes::new()
            .on_simple(record(&log, "simple"))
            .non_typed(record(&log, "untyped"))
            .clear()
            .build();
        dispatcher.dispatch(&typed("Simple")).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }
}
