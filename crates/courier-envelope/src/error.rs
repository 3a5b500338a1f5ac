//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::error::Error as StdError;

/// Boxed error used as the source of codec failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Reasons an envelope can be rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEnvelopeError {
    /// The id is empty or whitespace only.
    #[error("the envelope id must have text")]
    BlankId,
    /// The sender is empty or whitespace only.
    #[error("the envelope sender must have text")]
    BlankSender,
    /// No timestamp was provided.
    #[error("the envelope timestamp must be set")]
    MissingTimestamp,
    /// The timestamp could not be represented as an instant.
    #[error("timestamp {millis}ms is outside the representable range")]
    TimestampOutOfRange {
        /// Offending epoch milliseconds.
        millis: i64,
    },
    /// A header key or value is empty or whitespace only.
    #[error("header {key:?} must have a non-blank key and value")]
    BlankHeader {
        /// Key of the offending header (may itself be blank).
        key: String,
    },
}

/// Failure raised by [`crate::EnvelopeBuilder::build`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The assembled parts violate an envelope invariant.
    #[error(transparent)]
    Invalid(#[from] InvalidEnvelopeError),
    /// The bound payload encoder failed.
    #[error(transparent)]
    Encoding(#[from] PayloadEncodingError),
}

/// Failure raised by a [`crate::PayloadEncoder`].
#[derive(Debug, thiserror::Error)]
pub enum PayloadEncodingError {
    /// The underlying codec failed.
    #[error("could not encode payload of type {type_name}")]
    Codec {
        /// Rust type that was being encoded.
        type_name: &'static str,
        /// Codec error.
        #[source]
        source: BoxError,
    },
    /// The encoder refused the value.
    #[error("payload of type {type_name} was rejected: {reason}")]
    Rejected {
        /// Rust type that was being encoded.
        type_name: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

impl PayloadEncodingError {
    /// Wrap a codec error raised while encoding `T`.
    pub fn codec<T: ?Sized>(source: impl Into<BoxError>) -> Self {
        Self::Codec {
            type_name: std::any::type_name::<T>(),
            source: source.into(),
        }
    }

    /// Reject a value of type `T` with a reason.
    pub fn rejected<T: ?Sized>(reason: impl Into<String>) -> Self {
        Self::Rejected {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// Name of the type that failed to encode.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Codec { type_name, .. } | Self::Rejected { type_name, .. } => type_name,
        }
    }
}

/// Failure raised by a [`crate::PayloadDecoder`].
#[derive(Debug, thiserror::Error)]
pub enum PayloadDecodingError {
    /// The underlying codec failed.
    #[error("could not decode payload into {type_name}")]
    Codec {
        /// Rust type that was being produced.
        type_name: &'static str,
        /// Raw payload that failed to decode.
        raw: String,
        /// Codec error.
        #[source]
        source: BoxError,
    },
    /// The decoder refused the payload.
    #[error("payload could not be decoded into {type_name}: {reason}")]
    Rejected {
        /// Rust type that was being produced.
        type_name: &'static str,
        /// Raw payload that failed to decode.
        raw: String,
        /// Human readable reason.
        reason: String,
    },
}

impl PayloadDecodingError {
    /// Wrap a codec error raised while decoding `raw` into `T`.
    pub fn codec<T: ?Sized>(raw: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Codec {
            type_name: std::any::type_name::<T>(),
            raw: raw.into(),
            source: source.into(),
        }
    }

    /// Reject `raw` as a `T` with a reason.
    pub fn rejected<T: ?Sized>(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            type_name: std::any::type_name::<T>(),
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Name of the type the payload was decoded into.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Codec { type_name, .. } | Self::Rejected { type_name, .. } => type_name,
        }
    }

    /// Raw payload that could not be decoded.
    pub fn raw(&self) -> &str {
        match self {
            Self::Codec { raw, .. } | Self::Rejected { raw, .. } => raw,
        }
    }
}
