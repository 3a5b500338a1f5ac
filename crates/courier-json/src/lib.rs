//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "JSON payload codecs and envelope wire encoding."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! JSON bindings for courier envelopes.
//!
//! [`JsonPayloadEncoder`] and [`JsonPayloadDecoder`] plug serde types into
//! the envelope payload, tagged `JSON`. The [`wire`] module turns whole
//! envelopes into their five-field JSON form and back.
#![warn(missing_docs)]

pub mod payload;
pub mod wire;

pub use payload::{JsonPayloadDecoder, JsonPayloadEncoder};
pub use wire::{from_json, from_slice, to_json, to_json_pretty, to_vec, WireError};
