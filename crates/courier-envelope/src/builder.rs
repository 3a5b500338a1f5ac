//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::envelope::{Envelope, EnvelopeParts};
use crate::error::{BuildError, PayloadEncodingError};
use crate::headers::{ContentType, DefinedHeader, MessageType, COPY_HEADERS_SEPARATOR};
use crate::payload::PayloadEncoder;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;
type DeferredPayload = Box<dyn FnOnce() -> Result<String, PayloadEncodingError> + Send>;

/// Where the envelope timestamp comes from.
#[derive(Clone)]
pub enum TimestampSource {
    /// Sample the clock when `build` runs.
    BuildTime,
    /// Use a pinned instant.
    Fixed(DateTime<Utc>),
    /// Ask a caller supplied clock when `build` runs.
    Supplied(Clock),
}

impl TimestampSource {
    fn resolve(&self) -> DateTime<Utc> {
        match self {
            TimestampSource::BuildTime => Utc::now(),
            TimestampSource::Fixed(instant) => *instant,
            TimestampSource::Supplied(clock) => clock(),
        }
    }
}

impl fmt::Debug for TimestampSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampSource::BuildTime => f.write_str("BuildTime"),
            TimestampSource::Fixed(instant) => f.debug_tuple("Fixed").field(instant).finish(),
            TimestampSource::Supplied(_) => f.write_str("Supplied(..)"),
        }
    }
}

enum Payload {
    Raw(String),
    Deferred(DeferredPayload),
}

impl Payload {
    fn into_string(self) -> Result<String, PayloadEncodingError> {
        match self {
            Payload::Raw(raw) => Ok(raw),
            Payload::Deferred(encode) => encode(),
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Raw(String::new())
    }
}

/// Single-use assembler for [`Envelope`]s.
///
/// Every setter consumes and returns the builder, so one builder produces
/// one envelope. Defaults are applied inside [`EnvelopeBuilder::build`]
/// only for values that were never set: a random UUID id and the instant
/// at which `build` runs.
///
/// ```
/// use courier_envelope::{EnvelopeBuilder, MessageType};
///
/// let envelope = EnvelopeBuilder::new()
///     .with_sender("inventory")
///     .message_type(MessageType::Simple)
///     .with_header("X-Tenant", "acme")
///     .with_payload("restocked")
///     .build()
///     .unwrap();
/// assert_eq!(envelope.message_type(), Some("Simple"));
/// ```
#[derive(Default)]
pub struct EnvelopeBuilder {
    id: Option<String>,
    sender: Option<String>,
    timestamp: Option<TimestampSource>,
    headers: BTreeMap<String, String>,
    payload: Payload,
}

impl fmt::Debug for EnvelopeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = match &self.payload {
            Payload::Raw(raw) => raw.as_str(),
            Payload::Deferred(_) => "<deferred>",
        };
        f.debug_struct("EnvelopeBuilder")
            .field("id", &self.id)
            .field("sender", &self.sender)
            .field("timestamp", &self.timestamp)
            .field("headers", &self.headers)
            .field("payload", &payload)
            .finish()
    }
}

impl EnvelopeBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preset with `Message-Type: Simple`.
    pub fn simple() -> Self {
        Self::new().message_type(MessageType::Simple)
    }

    /// Builder preset with `Message-Type: Reply` and `Replies-To: id`.
    pub fn reply_to(replied_id: impl Into<String>) -> Self {
        Self::new()
            .message_type(MessageType::Reply)
            .replies_to(replied_id)
    }

    /// Builder preset with `Message-Type: Command` and `Command: command`.
    pub fn command_message(command: impl Into<String>) -> Self {
        Self::new()
            .message_type(MessageType::Command)
            .command(command)
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a freshly generated random id now.
    pub fn with_random_id(self) -> Self {
        self.with_id(Uuid::new_v4().to_string())
    }

    /// Set the sender.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Pin the timestamp to `instant`.
    pub fn at(mut self, instant: DateTime<Utc>) -> Self {
        self.timestamp = Some(TimestampSource::Fixed(instant));
        self
    }

    /// Pin the timestamp to the current instant.
    pub fn at_now(self) -> Self {
        self.at(Utc::now())
    }

    /// Take the timestamp when `build` runs.
    pub fn at_build_time(mut self) -> Self {
        self.timestamp = Some(TimestampSource::BuildTime);
        self
    }

    /// Ask `clock` for the timestamp when `build` runs.
    pub fn at_supplied<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.timestamp = Some(TimestampSource::Supplied(Arc::new(clock)));
        self
    }

    /// Set a header, replacing any previous value for the key.
    pub fn with_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers
            .insert(key.as_ref().to_owned(), value.as_ref().to_owned());
        self
    }

    /// Merge headers, later entries winning on key collision.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Drop every header, then merge `headers`.
    pub fn replace_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.clear();
        self.with_headers(headers)
    }

    /// Remove the header stored under `key`.
    pub fn without_header(mut self, key: impl AsRef<str>) -> Self {
        self.headers.remove(key.as_ref());
        self
    }

    /// Remove every header.
    pub fn clear_headers(mut self) -> Self {
        self.headers.clear();
        self
    }

    /// Set `Message-Type`.
    pub fn message_type(self, message_type: impl AsRef<str>) -> Self {
        self.with_header(DefinedHeader::MessageType, message_type)
    }

    /// Set `Content-Type`.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.with_header(DefinedHeader::ContentType, content_type)
    }

    /// Set `Content-Type: Plain`.
    pub fn plain_text(self) -> Self {
        self.content_type(ContentType::Plain)
    }

    /// Set `Content-Type: JSON`.
    pub fn json(self) -> Self {
        self.content_type(ContentType::Json)
    }

    /// Set `Replies-To`.
    pub fn replies_to(self, replied_id: impl Into<String>) -> Self {
        self.with_header(DefinedHeader::RepliesTo, replied_id.into())
    }

    /// Set `Command`.
    pub fn command(self, command: impl Into<String>) -> Self {
        self.with_header(DefinedHeader::Command, command.into())
    }

    /// Set `Copy-Headers` to the given header names.
    pub fn copy_headers<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = names
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(COPY_HEADERS_SEPARATOR);
        self.with_header(DefinedHeader::CopyHeaders, joined)
    }

    /// Use `payload` verbatim.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Payload::Raw(payload.into());
        self
    }

    /// Encode `value` with `encoder` when `build` runs.
    ///
    /// `Content-Type` is set to the encoder's tag right away.
    pub fn with_encoded_payload<T, E>(mut self, value: T, encoder: E) -> Self
    where
        T: Send + 'static,
        E: PayloadEncoder<T> + Send + 'static,
    {
        let content_type = encoder.content_type().to_owned();
        self.payload = Payload::Deferred(Box::new(move || encoder.encode(&value)));
        self.content_type(content_type)
    }

    /// Forget everything set so far.
    pub fn clear(self) -> Self {
        Self::default()
    }

    /// Apply defaults, encode the payload and validate.
    pub fn build(self) -> Result<Envelope, BuildError> {
        let EnvelopeBuilder {
            id,
            sender,
            timestamp,
            headers,
            payload,
        } = self;

        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let timestamp = timestamp.unwrap_or(TimestampSource::BuildTime).resolve();
        let payload = payload.into_string()?;

        let envelope = Envelope::from_parts(EnvelopeParts {
            id,
            sender: sender.unwrap_or_default(),
            timestamp: Some(timestamp),
            headers,
            payload,
        })?;
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::error::InvalidEnvelopeError;
    use crate::payload::{DisplayEncoder, PlainEncoder};
    use crate::ContentTypeHandler;

    #[test]
    fn explicit_values_are_kept() {
        let instant = Utc.timestamp_millis_opt(1_000).unwrap();
        let envelope = EnvelopeBuilder::new()
            .with_id("m1")
            .with_sender("billing")
            .at(instant)
            .with_header("X-Tenant", "acme")
            .with_payload("body")
            .build()
            .expect("valid envelope");

        assert_eq!(envelope.id(), "m1");
        assert_eq!(envelope.sender(), "billing");
        assert_eq!(envelope.timestamp(), instant);
        assert_eq!(envelope.header("X-Tenant"), Some("acme"));
        assert_eq!(envelope.payload(), "body");
    }

    #[test]
    fn defaults_are_fresh_per_build() {
        let before = Utc::now();
        let first = EnvelopeBuilder::new().with_sender("a").build().unwrap();
        let second = EnvelopeBuilder::new().with_sender("a").build().unwrap();
        let after = Utc::now();

        assert_ne!(first.id(), second.id());
        assert!(Uuid::parse_str(first.id()).is_ok());
        assert!(first.timestamp() >= before && first.timestamp() <= after);
    }

    #[test]
    fn timestamp_is_taken_at_build_not_creation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let pinned = Utc.timestamp_millis_opt(42).unwrap();
        let builder = EnvelopeBuilder::new()
            .with_sender("a")
            .at_supplied(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                pinned
            });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let envelope = builder.build().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(envelope.timestamp(), pinned);
    }

    #[test]
    fn at_now_pins_before_build() {
        let builder = EnvelopeBuilder::new().with_sender("a").at_now();
        let pinned_before = Utc::now();
        let envelope = builder.build().unwrap();
        assert!(envelope.timestamp() <= pinned_before);
        assert!(envelope.timestamp() > pinned_before - Duration::seconds(5));
    }

    #[test]
    fn missing_or_blank_sender_fails() {
        let err = EnvelopeBuilder::new().build().expect_err("no sender");
        assert!(matches!(
            err,
            BuildError::Invalid(InvalidEnvelopeError::BlankSender)
        ));

        let err = EnvelopeBuilder::new()
            .with_sender("a")
            .with_id(" ")
            .build()
            .expect_err("blank id");
        assert!(matches!(err, BuildError::Invalid(InvalidEnvelopeError::BlankId)));
    }

    #[test]
    fn blank_header_fails() {
        let err = EnvelopeBuilder::new()
            .with_sender("a")
            .with_header("X-Empty", "")
            .build()
            .expect_err("blank header value");
        assert!(matches!(
            err,
            BuildError::Invalid(InvalidEnvelopeError::BlankHeader { .. })
        ));
    }

    #[test]
    fn header_mutation_operations() {
        let envelope = EnvelopeBuilder::new()
            .with_sender("a")
            .with_header("A", "1")
            .with_header("A", "2")
            .with_headers([("B", "1"), ("C", "1")])
            .without_header("C")
            .build()
            .unwrap();
        assert_eq!(envelope.header("A"), Some("2"));
        assert_eq!(envelope.header("B"), Some("1"));
        assert!(!envelope.headers().contains_key("C"));

        let envelope = EnvelopeBuilder::new()
            .with_sender("a")
            .with_header("A", "1")
            .replace_headers([("Z", "9")])
            .build()
            .unwrap();
        assert_eq!(envelope.headers().keys().collect::<Vec<_>>(), vec!["Z"]);

        let envelope = EnvelopeBuilder::simple()
            .with_sender("a")
            .clear_headers()
            .build()
            .unwrap();
        assert!(envelope.headers().is_empty());
    }

    #[test]
    fn well_known_setters_use_canonical_strings() {
        let envelope = EnvelopeBuilder::command_message("refund")
            .with_sender("a")
            .json()
            .copy_headers(["X-Trace", "X-Tenant"])
            .build()
            .unwrap();
        assert_eq!(envelope.message_type(), Some("Command"));
        assert_eq!(envelope.command(), Some("refund"));
        assert_eq!(envelope.content_type(), Some("JSON"));
        assert_eq!(
            envelope.header(DefinedHeader::CopyHeaders),
            Some("X-Trace, X-Tenant")
        );

        let reply = EnvelopeBuilder::reply_to("m1")
            .with_sender("a")
            .plain_text()
            .build()
            .unwrap();
        assert_eq!(reply.message_type(), Some("Reply"));
        assert_eq!(reply.replies_to(), Some("m1"));
        assert_eq!(reply.content_type(), Some("Plain"));
    }

    #[test]
    fn encoder_sets_content_type_and_runs_at_build() {
        let envelope = EnvelopeBuilder::new()
            .with_sender("a")
            .with_encoded_payload(12.5_f64, DisplayEncoder)
            .build()
            .unwrap();
        assert_eq!(envelope.payload(), "12.5");
        assert_eq!(envelope.content_type(), Some("Plain"));

        let envelope = EnvelopeBuilder::new()
            .with_sender("a")
            .with_encoded_payload(String::from("raw"), PlainEncoder)
            .build()
            .unwrap();
        assert_eq!(envelope.payload(), "raw");
    }

    struct FailingEncoder;

    impl ContentTypeHandler for FailingEncoder {
        fn content_type(&self) -> &str {
            "Custom"
        }
    }

    impl PayloadEncoder<u8> for FailingEncoder {
        fn encode(&self, _value: &u8) -> Result<String, PayloadEncodingError> {
            Err(PayloadEncodingError::rejected::<u8>("unsupported"))
        }
    }

    #[test]
    fn encoder_failure_aborts_build() {
        let builder = EnvelopeBuilder::new()
            .with_sender("a")
            .with_encoded_payload(1_u8, FailingEncoder);
        let err = builder.build().expect_err("encoder fails");
        assert!(matches!(err, BuildError::Encoding(_)));
    }

    #[test]
    fn clear_resets_everything() {
        let err = EnvelopeBuilder::new()
            .with_sender("a")
            .with_header("A", "1")
            .clear()
            .build()
            .expect_err("sender cleared");
        assert!(matches!(
            err,
            BuildError::Invalid(InvalidEnvelopeError::BlankSender)
        ));
    }
}
