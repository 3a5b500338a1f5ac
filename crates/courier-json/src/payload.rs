//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "JSON payload codecs and envelope wire encoding."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fmt;
use std::marker::PhantomData;

use courier_envelope::{
    ContentType, ContentTypeHandler, PayloadDecoder, PayloadDecodingError, PayloadEncoder,
    PayloadEncodingError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes `T` as a JSON document.
pub struct JsonPayloadEncoder<T> {
    _marker: PhantomData<fn(&T)>,
}

impl<T> JsonPayloadEncoder<T> {
    /// Encoder for `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonPayloadEncoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonPayloadEncoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonPayloadEncoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonPayloadEncoder<{}>", std::any::type_name::<T>())
    }
}

impl<T> ContentTypeHandler for JsonPayloadEncoder<T> {
    fn content_type(&self) -> &str {
        ContentType::Json.as_str()
    }
}

impl<T: Serialize> PayloadEncoder<T> for JsonPayloadEncoder<T> {
    fn encode(&self, value: &T) -> Result<String, PayloadEncodingError> {
        serde_json::to_string(value).map_err(PayloadEncodingError::codec::<T>)
    }
}

/// Decodes JSON documents into `T`.
pub struct JsonPayloadDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonPayloadDecoder<T> {
    /// Decoder producing `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonPayloadDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonPayloadDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonPayloadDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonPayloadDecoder<{}>", std::any::type_name::<T>())
    }
}

impl<T> ContentTypeHandler for JsonPayloadDecoder<T> {
    fn content_type(&self) -> &str {
        ContentType::Json.as_str()
    }
}

impl<T: DeserializeOwned> PayloadDecoder for JsonPayloadDecoder<T> {
    type Output = T;

    fn decode(&self, raw: &str) -> Result<Self::Output, PayloadDecodingError> {
        serde_json::from_str(raw).map_err(|err| PayloadDecodingError::codec::<T>(raw, err))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Refund {
        order: String,
        cents: u64,
    }

    #[test]
    fn encodes_and_tags_json() {
        let encoder = JsonPayloadEncoder::<Refund>::new();
        let raw = encoder
            .encode(&Refund {
                order: "o-1".into(),
                cents: 250,
            })
            .expect("encode");
        assert_eq!(raw, r#"{"order":"o-1","cents":250}"#);
        assert_eq!(encoder.content_type(), "JSON");
    }

    #[test]
    fn malformed_payload_reports_raw_input() {
        let decoder = JsonPayloadDecoder::<Refund>::new();
        let err = decoder.decode("{not json").expect_err("malformed");
        assert_eq!(err.raw(), "{not json");
        assert!(err.type_name().ends_with("Refund"));

        let err = decoder
            .decode(r#"{"order":"o-1"}"#)
            .expect_err("missing field");
        assert!(matches!(err, PayloadDecodingError::Codec { .. }));
    }

    #[test]
    fn decodes_well_formed_payload() {
        let decoder = JsonPayloadDecoder::<Refund>::new();
        let refund = decoder
            .decode(r#"{"order":"o-1","cents":250}"#)
            .expect("decode");
        assert_eq!(refund.cents, 250);
    }
}
