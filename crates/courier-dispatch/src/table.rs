//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope handlers and dispatch tables."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::HashMap;

use crate::handler::{boxed, do_nothing, BoxedHandler, EnvelopeHandler};

/// Exact-match key to handler table with a default, shared by both
/// dispatch levels.
#[derive(Clone)]
pub(crate) struct RouteTable {
    handlers: HashMap<String, BoxedHandler>,
    fallback: BoxedHandler,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: boxed(do_nothing),
        }
    }
}

impl RouteTable {
    pub(crate) fn insert(&mut self, key: impl AsRef<str>, handler: impl EnvelopeHandler + 'static) {
        self.handlers.insert(key.as_ref().to_owned(), boxed(handler));
    }

    pub(crate) fn extend<I, K, H>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: EnvelopeHandler + 'static,
    {
        for (key, handler) in handlers {
            self.insert(key, handler);
        }
    }

    pub(crate) fn replace<I, K, H>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: EnvelopeHandler + 'static,
    {
        self.handlers.clear();
        self.extend(handlers);
    }

    pub(crate) fn set_fallback(&mut self, handler: impl EnvelopeHandler + 'static) {
        self.fallback = boxed(handler);
    }

    pub(crate) fn lookup(&self, key: &str) -> Option<&dyn EnvelopeHandler> {
        self.handlers.get(key).map(|handler| handler.as_ref())
    }

    pub(crate) fn fallback(&self) -> &dyn EnvelopeHandler {
        self.fallback.as_ref()
    }

    /// Registered keys, sorted for stable output.
    pub(crate) fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
