//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::btree_map;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidEnvelopeError;
use crate::headers::{DefinedHeader, MessageType, COPY_HEADERS_SEPARATOR};
use crate::wire::WireEnvelope;

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Read-only view over the headers of an [`Envelope`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Value stored under `key`.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.0.get(key.as_ref()).map(String::as_str)
    }

    /// Whether a header named `key` is present.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.0.contains_key(key.as_ref())
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over header keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the envelope carries no headers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Owned copy of the header map.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Unvalidated envelope fields, consumed by [`Envelope::from_parts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvelopeParts {
    /// Unique id of the logical message.
    pub id: String,
    /// Identification of the origin.
    pub sender: String,
    /// Creation instant; `None` is rejected.
    pub timestamp: Option<DateTime<Utc>>,
    /// Header map; keys are unique by construction.
    pub headers: BTreeMap<String, String>,
    /// Raw encoded payload.
    pub payload: String,
}

/// Immutable message value.
///
/// Envelopes can only be obtained through [`Envelope::from_parts`], the
/// [`crate::EnvelopeBuilder`] or deserialization, all of which enforce the
/// same invariants: non-blank id and sender, a timestamp, and non-blank
/// header keys and values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireEnvelope", into = "WireEnvelope")]
pub struct Envelope {
    id: String,
    sender: String,
    timestamp: DateTime<Utc>,
    headers: Headers,
    payload: String,
}

impl Envelope {
    /// Validate `parts` and freeze them into an envelope.
    pub fn from_parts(parts: EnvelopeParts) -> Result<Self, InvalidEnvelopeError> {
        let EnvelopeParts {
            id,
            sender,
            timestamp,
            headers,
            payload,
        } = parts;

        if is_blank(&id) {
            return Err(InvalidEnvelopeError::BlankId);
        }
        if is_blank(&sender) {
            return Err(InvalidEnvelopeError::BlankSender);
        }
        let timestamp = timestamp.ok_or(InvalidEnvelopeError::MissingTimestamp)?;
        if let Some((key, _)) = headers
            .iter()
            .find(|(key, value)| is_blank(key) || is_blank(value))
        {
            return Err(InvalidEnvelopeError::BlankHeader { key: key.clone() });
        }

        Ok(Self {
            id,
            sender,
            timestamp,
            headers: Headers(headers),
            payload,
        })
    }

    /// Give back the owned fields, e.g. to derive a modified copy.
    pub fn into_parts(self) -> EnvelopeParts {
        EnvelopeParts {
            id: self.id,
            sender: self.sender,
            timestamp: Some(self.timestamp),
            headers: self.headers.0,
            payload: self.payload,
        }
    }

    /// Unique id of the logical message.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identification of the origin.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Creation instant.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Read-only headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw encoded payload; its schema is given by `Content-Type`.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Value of an arbitrary header.
    pub fn header(&self, key: impl AsRef<str>) -> Option<&str> {
        self.headers.get(key)
    }

    /// Value of `Message-Type`, if present.
    pub fn message_type(&self) -> Option<&str> {
        self.header(DefinedHeader::MessageType)
    }

    /// Value of `Content-Type`, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.header(DefinedHeader::ContentType)
    }

    /// Value of `Replies-To`, if present.
    pub fn replies_to(&self) -> Option<&str> {
        self.header(DefinedHeader::RepliesTo)
    }

    /// Value of `Command`, only when this is a command message.
    pub fn command(&self) -> Option<&str> {
        if self.message_type() == Some(MessageType::Command.as_str()) {
            self.header(DefinedHeader::Command)
        } else {
            None
        }
    }

    /// Header names listed in `Copy-Headers`, in declared order.
    pub fn copy_headers(&self) -> Vec<&str> {
        self.header(DefinedHeader::CopyHeaders)
            .map(|value| {
                value
                    .split(COPY_HEADERS_SEPARATOR)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Companion header required by the declared message type but absent.
    ///
    /// Construction does not enforce companions; received envelopes may be
    /// malformed and are still routed.
    pub fn missing_required_header(&self) -> Option<DefinedHeader> {
        let message_type = self.message_type()?.parse::<MessageType>().ok()?;
        message_type
            .required_header()
            .filter(|header| !self.headers.contains_key(header))
    }
}
