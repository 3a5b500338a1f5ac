//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Five-field serialized form shared with every other courier peer.
//!
//! Field names are part of the wire contract and must not change:
//! `id`, `sn` (sender), `ts` (epoch milliseconds), `hs` (headers) and
//! `pl` (payload). Missing fields deserialize to empty values so that the
//! envelope validation, not the codec, reports what is wrong.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, EnvelopeParts};
use crate::error::InvalidEnvelopeError;

/// Serialized representation of an [`Envelope`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnvelope {
    /// Envelope id.
    #[serde(default)]
    pub id: String,
    /// Sender.
    #[serde(rename = "sn", default)]
    pub sender: String,
    /// Timestamp as milliseconds since the Unix epoch.
    #[serde(rename = "ts", default)]
    pub timestamp_ms: Option<i64>,
    /// Headers.
    #[serde(rename = "hs", default)]
    pub headers: BTreeMap<String, String>,
    /// Raw payload; `null` is read as empty.
    #[serde(rename = "pl", default)]
    pub payload: Option<String>,
}

impl From<Envelope> for WireEnvelope {
    fn from(envelope: Envelope) -> Self {
        let timestamp_ms = envelope.timestamp().timestamp_millis();
        let parts = envelope.into_parts();
        Self {
            id: parts.id,
            sender: parts.sender,
            timestamp_ms: Some(timestamp_ms),
            headers: parts.headers,
            payload: Some(parts.payload),
        }
    }
}

impl TryFrom<WireEnvelope> for Envelope {
    type Error = InvalidEnvelopeError;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        let timestamp = match wire.timestamp_ms {
            Some(millis) => Some(
                DateTime::<Utc>::from_timestamp_millis(millis)
                    .ok_or(InvalidEnvelopeError::TimestampOutOfRange { millis })?,
            ),
            None => None,
        };
        Envelope::from_parts(EnvelopeParts {
            id: wire.id,
            sender: wire.sender,
            timestamp,
            headers: wire.headers,
            payload: wire.payload.unwrap_or_default(),
        })
    }
}
