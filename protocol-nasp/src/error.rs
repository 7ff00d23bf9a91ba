//! Error types for NASP object construction and decoding.

use crate::message::PayloadKind;
use crate::value::ObjectType;

/// Error raised when an object or message cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// Payload exceeds the ceiling for its object type.
    #[error("{kind} too large: {len} bytes exceeds {max} byte limit")]
    SizeExceeded {
        kind: ObjectType,
        len: usize,
        max: usize,
    },

    /// Simple string or simple error text carries a raw CR or LF.
    #[error("{0} must not contain CR or LF")]
    ContainsCrLf(ObjectType),

    /// Array or command holds more elements than allowed.
    #[error("too many elements: {len} exceeds limit of {max}")]
    TooManyElements { len: usize, max: usize },

    /// Numeric literal parses to a value outside the representable range.
    #[error("number out of range: {0}")]
    NumberOutOfRange(String),

    /// Numeric literal is not a number.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// Tagged string encoding tag is not exactly 3 bytes.
    #[error("encoding tag must be 3 bytes, got {0}")]
    EncodingLength(usize),

    /// Command name is not one of the recognized commands.
    #[error("unrecognized command name: {0}")]
    UnrecognizedCommand(String),

    /// A custom payload was built without inline text.
    #[error("custom payload requires data")]
    MissingCustomData,

    /// Custom payload text carries CR or LF, or spells a reserved keyword.
    #[error("invalid custom payload text: {0:?}")]
    InvalidCustomData(String),

    /// Message body is absent, present, or of the wrong kind for its payload.
    #[error("message body does not match {0} payload")]
    BodyMismatch(PayloadKind),
}

/// Error returned by decode operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Leading byte does not name an object type.
    #[error("unrecognized object type: {0:#04x}")]
    UnrecognizedObjectType(u8),

    /// Envelope does not start with `REQ` or `RES`.
    #[error("unrecognized message kind: {0}")]
    UnrecognizedMessageKind(String),

    /// Command body names an unknown command.
    #[error("unrecognized command name: {0}")]
    UnrecognizedCommand(String),

    /// Length-prefixed payload is not followed by CRLF.
    #[error("missing terminator")]
    MissingTerminator,

    /// Simple string or simple error carries a raw CR or LF.
    #[error("{0} contains CR or LF")]
    ContainsCrLf(ObjectType),

    /// Tagged string encoding tag is not 3 bytes long.
    #[error("encoding length mismatch: got {0}, expected 3")]
    EncodingLengthMismatch(usize),

    /// Buffer ended before the frame did.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Length, count, or identifier line is not a decimal integer.
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Arrays nest deeper than the configured limit.
    #[error("nesting too deep: depth {0} exceeds limit")]
    NestingTooDeep(usize),

    /// Input buffer exceeds the message size limit.
    #[error("message too large: {len} bytes exceeds {max} byte limit")]
    MessageTooLarge { len: usize, max: usize },

    /// A decoded payload violates an object invariant.
    #[error(transparent)]
    Object(#[from] ObjectError),
}

impl DecodeError {
    /// Returns true if this error came from object construction rather than framing.
    #[inline]
    pub fn is_object_error(&self) -> bool {
        matches!(self, DecodeError::Object(_))
    }
}
