//! ---
//! courier_section: "02-envelope-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Envelope value type, builder and header vocabulary."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Well-known header keys and the closed tag sets used as dispatch keys.
//!
//! Every tag maps to exactly one canonical string through `as_str`, and
//! parses back from that exact string. Callers remain free to use custom
//! header keys and custom content-type tags as plain strings.
use std::fmt;
use std::str::FromStr;

/// Separator used to join and split the header names listed in `Copy-Headers`.
pub const COPY_HEADERS_SEPARATOR: &str = ", ";

/// Error returned when a string is not the canonical form of a tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} tag: {value:?}")]
pub struct UnknownTag {
    /// Tag family that was being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

/// Header keys with a defined meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinedHeader {
    /// Kind of message, see [`MessageType`].
    MessageType,
    /// Tag describing the payload schema, see [`ContentType`].
    ContentType,
    /// Id of the envelope a reply answers.
    RepliesTo,
    /// Command requested by a command message.
    Command,
    /// Comma separated header names a reply must carry over.
    CopyHeaders,
}

impl DefinedHeader {
    /// Every defined header, in declaration order.
    pub const ALL: [DefinedHeader; 5] = [
        DefinedHeader::MessageType,
        DefinedHeader::ContentType,
        DefinedHeader::RepliesTo,
        DefinedHeader::Command,
        DefinedHeader::CopyHeaders,
    ];

    /// Canonical header key.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DefinedHeader::MessageType => "Message-Type",
            DefinedHeader::ContentType => "Content-Type",
            DefinedHeader::RepliesTo => "Replies-To",
            DefinedHeader::Command => "Command",
            DefinedHeader::CopyHeaders => "Copy-Headers",
        }
    }
}

/// Kind of message carried by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Standalone message.
    Simple,
    /// Answer to a previous message; requires `Replies-To`.
    Reply,
    /// Request to execute something; requires `Command`.
    Command,
}

impl MessageType {
    /// Every message type, in declaration order.
    pub const ALL: [MessageType; 3] = [MessageType::Simple, MessageType::Reply, MessageType::Command];

    /// Canonical header value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageType::Simple => "Simple",
            MessageType::Reply => "Reply",
            MessageType::Command => "Command",
        }
    }

    /// Companion header a message of this type must carry, if any.
    pub const fn required_header(&self) -> Option<DefinedHeader> {
        match self {
            MessageType::Simple => None,
            MessageType::Reply => Some(DefinedHeader::RepliesTo),
            MessageType::Command => Some(DefinedHeader::Command),
        }
    }
}

/// Built-in payload content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Payload is plain text.
    Plain,
    /// Payload is a JSON document.
    Json,
}

impl ContentType {
    /// Every built-in content type, in declaration order.
    pub const ALL: [ContentType; 2] = [ContentType::Plain, ContentType::Json];

    /// Canonical header value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContentType::Plain => "Plain",
            ContentType::Json => "JSON",
        }
    }
}

macro_rules! tag_impls {
    ($ty:ty, $kind:literal) => {
        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownTag;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|tag| tag.as_str() == value)
                    .ok_or_else(|| UnknownTag {
                        kind: $kind,
                        value: value.to_owned(),
                    })
            }
        }
    };
}

tag_impls!(DefinedHeader, "header");
tag_impls!(MessageType, "message type");
tag_impls!(ContentType, "content type");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_strings_match_wire_vocabulary() {
        let keys: Vec<_> = DefinedHeader::ALL.iter().map(DefinedHeader::as_str).collect();
        assert_eq!(
            keys,
            ["Message-Type", "Content-Type", "Replies-To", "Command", "Copy-Headers"]
        );
        assert_eq!(MessageType::Reply.to_string(), "Reply");
        assert_eq!(ContentType::Json.as_ref(), "JSON");
    }

    #[test]
    fn parsing_is_exact() {
        assert_eq!("Command".parse::<MessageType>(), Ok(MessageType::Command));
        assert_eq!("Plain".parse::<ContentType>(), Ok(ContentType::Plain));
        let err = "json".parse::<ContentType>().expect_err("lowercase is not canonical");
        assert_eq!(err.kind, "content type");
        assert!("command".parse::<MessageType>().is_err());
    }

    #[test]
    fn companion_headers() {
        assert_eq!(MessageType::Simple.required_header(), None);
        assert_eq!(
            MessageType::Reply.required_header(),
            Some(DefinedHeader::RepliesTo)
        );
        assert_eq!(
            MessageType::Command.required_header(),
            Some(DefinedHeader::Command)
        );
    }
}
