//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Transport agnostic message envelope.
//!
//! An [`Envelope`] is an immutable value carrying an id, a sender, a
//! timestamp, a string header map and an opaque string payload whose schema
//! is declared by the `Content-Type` header. Envelopes are assembled with an
//! [`EnvelopeBuilder`], which applies defaults and validates every invariant
//! in a single step.
#![warn(missing_docs)]

pub mod builder;
pub mod envelope;
pub mod error;
pub mod headers;
pub mod payload;
pub mod reply;
pub mod wire;

pub use builder::{EnvelopeBuilder, TimestampSource};
pub use envelope::{Envelope, EnvelopeParts, Headers};
pub use error::{BoxError, BuildError, InvalidEnvelopeError, PayloadDecodingError, PayloadEncodingError};
pub use headers::{ContentType, DefinedHeader, MessageType, UnknownTag, COPY_HEADERS_SEPARATOR};
pub use payload::{
    ContentTypeHandler, DisplayEncoder, PayloadDecoder, PayloadEncoder, PlainDecoder, PlainEncoder,
};
pub use reply::{copy_headers_keys_and_values, EnvelopeFactory};
pub use wire::WireEnvelope;
