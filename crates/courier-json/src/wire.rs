//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "JSON payload codecs and envelope wire encoding."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Whole-envelope JSON encoding.
//!
//! Decoding separates malformed JSON from well-formed documents that carry
//! an invalid envelope, so callers can tell a broken peer from a bad sender.
use courier_envelope::{Envelope, InvalidEnvelopeError, WireEnvelope};
use thiserror::Error;

/// Failure while moving an envelope through its JSON form.
#[derive(Debug, Error)]
pub enum WireError {
    /// The input is not a JSON envelope document.
    #[error("malformed envelope json: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but breaks an envelope invariant.
    #[error("envelope json describes an invalid envelope: {0}")]
    Invalid(#[from] InvalidEnvelopeError),
}

/// Compact wire JSON for `envelope`.
pub fn to_json(envelope: &Envelope) -> Result<String, WireError> {
    Ok(serde_json::to_string(envelope)?)
}

/// Indented wire JSON for `envelope`.
pub fn to_json_pretty(envelope: &Envelope) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(envelope)?)
}

/// Compact wire JSON for `envelope` as bytes.
pub fn to_vec(envelope: &Envelope) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec(envelope)?)
}

/// Parse and validate an envelope from wire JSON.
///
/// ```
/// use courier_json::{from_json, WireError};
///
/// let envelope = from_json(r#"{"id":"m1","sn":"billing","ts":1700000000000,"hs":{},"pl":"hi"}"#)
///     .unwrap();
/// assert_eq!(envelope.sender(), "billing");
///
/// let blank_sender = from_json(r#"{"id":"m1","sn":" ","ts":1,"hs":{},"pl":""}"#);
/// assert!(matches!(blank_sender, Err(WireError::Invalid(_))));
/// assert!(matches!(from_json("{"), Err(WireError::Json(_))));
/// ```
pub fn from_json(raw: &str) -> Result<Envelope, WireError> {
    let wire: WireEnvelope = serde_json::from_str(raw)?;
    Ok(Envelope::try_from(wire)?)
}

/// Parse and validate an envelope from wire JSON bytes.
pub fn from_slice(raw: &[u8]) -> Result<Envelope, WireError> {
    let wire: WireEnvelope = serde_json::from_slice(raw)?;
    Ok(Envelope::try_from(wire)?)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use courier_envelope::EnvelopeBuilder;
    use serde_json::Value;

    use super::*;

    fn sample() -> Envelope {
        EnvelopeBuilder::command_message("refund")
            .with_id("m-7")
            .with_sender("billing")
            .at(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap())
            .plain_text()
            .with_payload("o-1")
            .build()
            .unwrap()
    }

    #[test]
    fn writes_five_short_fields() {
        let raw = to_json(&sample()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["hs", "id", "pl", "sn", "ts"]);
        assert_eq!(object["ts"], 1_700_000_000_123_i64);
        assert_eq!(object["hs"]["Command"], "refund");
    }

    #[test]
    fn reads_back_what_it_writes() {
        let original = sample();
        let restored = from_slice(&to_vec(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
        let pretty = to_json_pretty(&original).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(from_json(&pretty).unwrap(), original);
    }

    #[test]
    fn separates_syntax_from_validation_errors() {
        assert!(matches!(from_json("{"), Err(WireError::Json(_))));
        let blank_sender = r#"{"id":"m","sn":" ","ts":1,"hs":{},"pl":""}"#;
        assert!(matches!(
            from_json(blank_sender),
            Err(WireError::Invalid(InvalidEnvelopeError::BlankSender))
        ));
        assert!(matches!(
            from_json(r#"{"id":"m","sn":"a"}"#),
            Err(WireError::Invalid(InvalidEnvelopeError::MissingTimestamp))
        ));
    }
}
