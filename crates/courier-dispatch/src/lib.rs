//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope handlers and dispatch tables."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Header driven routing for courier envelopes.
//!
//! A [`TypeDispatcher`] routes on `Message-Type`; its `Command` entry is
//! normally a [`CommandDispatcher`] routing on `Command`. Leaves are often
//! [`DecodingHandler`]s that check `Content-Type` and decode the payload
//! before running application code. Every table is configured once and is
//! immutable afterwards.
//!
//! ```
//! use courier_dispatch::{CommandRoutes, ContentNegotiatingDecoder, TypeRoutes};
//! use courier_envelope::{Envelope, EnvelopeBuilder, PlainDecoder};
//!
//! let dispatcher = TypeRoutes::new()
//!     .with_commands(CommandRoutes::new().on_command_name(
//!         "greet",
//!         ContentNegotiatingDecoder::new(PlainDecoder).and_then(
//!             |name: String, _: &Envelope| -> anyhow::Result<()> {
//!                 assert_eq!(name, "ada");
//!                 Ok(())
//!             },
//!         ),
//!     ))
//!     .build();
//!
//! let envelope = EnvelopeBuilder::command_message("greet")
//!     .with_sender("docs")
//!     .plain_text()
//!     .with_payload("ada")
//!     .build()
//!     .unwrap();
//! dispatcher.dispatch(&envelope).unwrap();
//! ```

mod table;

pub mod command;
pub mod decoder;
pub mod handler;
pub mod metrics;
pub mod observer;
pub mod typed;

pub use command::{CommandDispatcher, CommandRoutes};
pub use decoder::{ContentNegotiatingDecoder, DecodingHandler};
pub use handler::{do_nothing, EnvelopeHandler, SharedHandler};
pub use metrics::DispatchMetrics;
pub use observer::{DispatchEvent, DispatchLevel, DispatchObserver, ObserverSet, TracingObserver};
pub use typed::{TypeDispatcher, TypeRoutes};
