//! Codec error type.

use std::fmt;

/// Errors raised while converting between records and wire items.
///
/// These are local failures raised before any network call; the codec
/// never defers an unmappable field to request time.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A field's type has no wire mapping.
    #[error("unsupported field kind for {field}: {kind}")]
    Unsupported {
        /// The offending field (attribute name).
        field: String,
        /// A short description of the unmappable kind.
        kind: &'static str,
    },

    /// An empty sequence carries no element to infer a set tag from.
    #[error("cannot infer a set tag for empty sequence field {field}")]
    EmptySet {
        /// The offending field (attribute name).
        field: String,
    },

    /// The value did not serialize as a struct or map.
    #[error("record must serialize as a struct or map")]
    NotARecord,

    /// A declared key attribute is missing from the encoded item.
    #[error("missing key attribute {0}")]
    MissingKey(String),

    /// Catch-all for serde-reported failures.
    #[error("{0}")]
    Message(String),
}

impl serde::ser::Error for CodecError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

impl serde::de::Error for CodecError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}
