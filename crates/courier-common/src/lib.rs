//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Shared configuration and logging for courier processes."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Shared plumbing for processes built on courier.
//! This crate exposes configuration loading, tracing initialisation and
//! the helpers that turn configuration into envelope factories and
//! dispatch observers.

pub mod config;
pub mod logging;

pub use config::{CourierConfig, DispatchConfig, EnvelopeConfig, LoadedConfig, LoggingConfig};
pub use logging::{init_tracing, LogFormat};
