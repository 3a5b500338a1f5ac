//! ---
//! courier_section: "04-transport"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Transport contract and in-process transports."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Delivery side of courier.
//!
//! Network transports live outside this workspace; this crate fixes the
//! contract they implement and provides the in-process transports used by
//! tests, tools and single-process deployments.

pub mod logging;
pub mod memory;
pub mod transport;

pub use logging::{log_envelope, EnvelopeDirection};
pub use memory::InMemoryTransport;
pub use transport::{FnTransport, Transport};

use courier_envelope::BoxError;

/// Shared result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised while handing an envelope to a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The recipient was empty or whitespace only.
    #[error("an envelope cannot be sent without a recipient")]
    MissingRecipient,
    /// The underlying transport refused or failed the delivery.
    #[error("delivery of envelope {envelope_id} to {recipient} failed")]
    Delivery {
        /// Envelope that was being sent.
        envelope_id: String,
        /// Intended recipient.
        recipient: String,
        /// Transport specific cause.
        #[source]
        source: BoxError,
    },
}
