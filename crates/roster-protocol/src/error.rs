//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means "the bytes or the parameter map did not
//! have the shape we expected". It never means the connection is broken.

/// Errors that can occur while framing or decoding boundary records.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed input, missing fields, or
    /// wrong types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A required parameter code was absent from an inbound payload.
    #[error("missing parameter {0}")]
    MissingParameter(u8),

    /// A parameter was present but had the wrong shape.
    #[error("parameter {code} is not {expected}")]
    WrongType { code: u8, expected: &'static str },

    /// The payload decoded but violates protocol rules.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
