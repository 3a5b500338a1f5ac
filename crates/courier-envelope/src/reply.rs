//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Reply propagation and per-sender builder presets.
use std::collections::BTreeMap;

use crate::builder::EnvelopeBuilder;
use crate::envelope::Envelope;
use crate::headers::MessageType;
use crate::payload::{ContentTypeHandler, DisplayEncoder, PayloadEncoder, PlainEncoder};

/// Headers of `original` named in its `Copy-Headers` header.
///
/// Names listed but absent from `original` are skipped silently.
pub fn copy_headers_keys_and_values(original: &Envelope) -> BTreeMap<String, String> {
    original
        .copy_headers()
        .into_iter()
        .filter_map(|name| {
            original
                .header(name)
                .map(|value| (name.to_owned(), value.to_owned()))
        })
        .collect()
}

impl Envelope {
    /// See [`copy_headers_keys_and_values`].
    pub fn copy_headers_keys_and_values(&self) -> BTreeMap<String, String> {
        copy_headers_keys_and_values(self)
    }
}

impl EnvelopeBuilder {
    /// Builder preset answering `original`.
    ///
    /// Sets `Message-Type: Reply` and `Replies-To`, then merges the headers
    /// `original` asked to have copied. Anything set on the returned builder
    /// afterwards overrides the copied values.
    ///
    /// The copied headers are merged last, so an original whose
    /// `Copy-Headers` names `Message-Type` or `Replies-To` replaces the reply
    /// markers with its own values. Set them again on the returned builder
    /// to restore them.
    pub fn reply_for(original: &Envelope) -> Self {
        Self::reply_to(original.id()).with_headers(copy_headers_keys_and_values(original))
    }
}

/// Hands out builders preconfigured for one sender and one payload encoder.
///
/// Every builder gets the sender, the default headers and a `Content-Type`
/// header carrying the encoder's tag. Values passed to
/// [`EnvelopeFactory::encode`] are encoded with that encoder when the
/// builder's `build` runs.
#[derive(Debug, Clone)]
pub struct EnvelopeFactory<E = PlainEncoder> {
    sender: String,
    default_headers: BTreeMap<String, String>,
    encoder: E,
}

impl EnvelopeFactory<PlainEncoder> {
    /// Factory stamping `sender` on every envelope, with text payloads.
    pub fn new(sender: impl Into<String>) -> Self {
        Self::plain(sender)
    }

    /// Factory for text payloads passed through unchanged.
    pub fn plain(sender: impl Into<String>) -> Self {
        EnvelopeFactory {
            sender: sender.into(),
            default_headers: BTreeMap::new(),
            encoder: PlainEncoder,
        }
    }
}

impl EnvelopeFactory<DisplayEncoder> {
    /// Factory encoding any `Display` value through its string form.
    pub fn display(sender: impl Into<String>) -> Self {
        EnvelopeFactory::plain(sender).with_encoder(DisplayEncoder)
    }
}

impl<E> EnvelopeFactory<E>
where
    E: ContentTypeHandler + Clone + Send + 'static,
{
    /// Swap the payload encoder, keeping sender and default headers.
    pub fn with_encoder<F>(self, encoder: F) -> EnvelopeFactory<F>
    where
        F: ContentTypeHandler + Clone + Send + 'static,
    {
        EnvelopeFactory {
            sender: self.sender,
            default_headers: self.default_headers,
            encoder,
        }
    }

    /// Add a header applied to every builder before any preset headers.
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Add several default headers.
    pub fn with_default_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.default_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sender stamped by this factory.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Default headers applied by this factory.
    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Encoder bound to this factory.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Builder with sender, default headers and the encoder's `Content-Type`.
    pub fn create(&self) -> EnvelopeBuilder {
        EnvelopeBuilder::new()
            .with_sender(self.sender.clone())
            .with_headers(self.default_headers.clone())
            .content_type(self.encoder.content_type())
    }

    /// Simple message builder.
    pub fn simple(&self) -> EnvelopeBuilder {
        self.create().message_type(MessageType::Simple)
    }

    /// Reply builder for a known id.
    pub fn reply_to(&self, replied_id: impl Into<String>) -> EnvelopeBuilder {
        self.create()
            .message_type(MessageType::Reply)
            .replies_to(replied_id)
    }

    /// Reply builder carrying over the headers `original` asked for.
    pub fn reply_for(&self, original: &Envelope) -> EnvelopeBuilder {
        self.reply_to(original.id())
            .with_headers(copy_headers_keys_and_values(original))
    }

    /// Command message builder.
    pub fn command(&self, command: impl Into<String>) -> EnvelopeBuilder {
        self.create()
            .message_type(MessageType::Command)
            .command(command)
    }

    /// Give `builder` a payload encoded from `value` by this factory's
    /// encoder when the builder's `build` runs.
    pub fn encode<T>(&self, builder: EnvelopeBuilder, value: T) -> EnvelopeBuilder
    where
        T: Send + 'static,
        E: PayloadEncoder<T>,
    {
        builder.with_encoded_payload(value, self.encoder.clone())
    }
}
