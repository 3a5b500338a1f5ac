//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Payload codec contracts and the built-in plain text codecs.
use std::fmt::Display;

use crate::error::{PayloadDecodingError, PayloadEncodingError};
use crate::headers::ContentType;

/// Anything bound to a single content-type tag.
pub trait ContentTypeHandler {
    /// Tag written to, or expected in, the `Content-Type` header.
    fn content_type(&self) -> &str;
}

/// Turns values of `T` into envelope payload strings.
pub trait PayloadEncoder<T: ?Sized>: ContentTypeHandler {
    /// Encode `value`.
    fn encode(&self, value: &T) -> Result<String, PayloadEncodingError>;
}

/// Turns envelope payload strings into typed values.
pub trait PayloadDecoder: ContentTypeHandler {
    /// Decoded value type.
    type Output;

    /// Decode `raw`.
    fn decode(&self, raw: &str) -> Result<Self::Output, PayloadDecodingError>;
}

/// Identity encoder for text payloads, tagged `Plain`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainEncoder;

impl ContentTypeHandler for PlainEncoder {
    fn content_type(&self) -> &str {
        ContentType::Plain.as_str()
    }
}

impl PayloadEncoder<str> for PlainEncoder {
    fn encode(&self, value: &str) -> Result<String, PayloadEncodingError> {
        Ok(value.to_owned())
    }
}

impl PayloadEncoder<String> for PlainEncoder {
    fn encode(&self, value: &String) -> Result<String, PayloadEncodingError> {
        Ok(value.clone())
    }
}

/// Encodes any [`Display`] value through its string form, tagged `Plain`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayEncoder;

impl ContentTypeHandler for DisplayEncoder {
    fn content_type(&self) -> &str {
        ContentType::Plain.as_str()
    }
}

impl<T: Display + ?Sized> PayloadEncoder<T> for DisplayEncoder {
    fn encode(&self, value: &T) -> Result<String, PayloadEncodingError> {
        Ok(value.to_string())
    }
}

/// Identity decoder for text payloads, tagged `Plain`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDecoder;

impl ContentTypeHandler for PlainDecoder {
    fn content_type(&self) -> &str {
        ContentType::Plain.as_str()
    }
}

impl PayloadDecoder for PlainDecoder {
    type Output = String;

    fn decode(&self, raw: &str) -> Result<Self::Output, PayloadDecodingError> {
        Ok(raw.to_owned())
    }
}
