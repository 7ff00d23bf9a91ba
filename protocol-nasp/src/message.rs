//! Request/response envelope.
//!
//! ```text
//! <REQ|RES>\r\n<id>\r\n<payload-keyword>\r\n[<body-frame>]
//! ```
//!
//! The payload keyword is `COMMAND` (body is a command), `VALUE` (body is any
//! object), or any other token, which is carried verbatim as custom text with
//! no body.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::aggregate::Command;
use crate::constants::{COMMAND_KEYWORD, CRLF, REQUEST_TOKEN, RESPONSE_TOKEN, VALUE_KEYWORD};
use crate::error::ObjectError;
use crate::simple::contains_cr_or_lf;
use crate::value::{Object, Value};

/// Whether a message is a request or a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Request,
    Response,
}

impl MessageKind {
    /// Envelope token: `REQ` or `RES`.
    pub const fn token(self) -> &'static str {
        match self {
            MessageKind::Request => REQUEST_TOKEN,
            MessageKind::Response => RESPONSE_TOKEN,
        }
    }

    /// Resolve an envelope token, ignoring ASCII case.
    pub fn parse(token: &[u8]) -> Option<Self> {
        if token.eq_ignore_ascii_case(REQUEST_TOKEN.as_bytes()) {
            Some(MessageKind::Request)
        } else if token.eq_ignore_ascii_case(RESPONSE_TOKEN.as_bytes()) {
            Some(MessageKind::Response)
        } else {
            None
        }
    }
}

/// What a message body holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Body is a [`Command`].
    Command,
    /// Body is any [`Value`].
    Value,
    /// No body; the payload text is the content.
    Custom,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayloadKind::Command => COMMAND_KEYWORD,
            PayloadKind::Value => VALUE_KEYWORD,
            PayloadKind::Custom => "CUSTOM",
        })
    }
}

fn is_reserved_keyword(text: &str) -> bool {
    text.eq_ignore_ascii_case(COMMAND_KEYWORD) || text.eq_ignore_ascii_case(VALUE_KEYWORD)
}

/// Payload descriptor: its kind plus the keyword written on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    kind: PayloadKind,
    data: String,
}

impl Payload {
    /// Create a payload descriptor. Custom payloads require `data`; it is
    /// ignored for the other kinds.
    pub fn new(kind: PayloadKind, data: Option<&str>) -> Result<Self, ObjectError> {
        match kind {
            PayloadKind::Command => Ok(Self::command()),
            PayloadKind::Value => Ok(Self::value()),
            PayloadKind::Custom => Self::custom(data.ok_or(ObjectError::MissingCustomData)?),
        }
    }

    pub fn command() -> Self {
        Self {
            kind: PayloadKind::Command,
            data: COMMAND_KEYWORD.to_string(),
        }
    }

    pub fn value() -> Self {
        Self {
            kind: PayloadKind::Value,
            data: VALUE_KEYWORD.to_string(),
        }
    }

    /// Create a custom payload.
    ///
    /// The text is written as the keyword line, so it may not contain CR or
    /// LF and may not spell `COMMAND` or `VALUE` in any case.
    pub fn custom(text: impl Into<String>) -> Result<Self, ObjectError> {
        let data = text.into();
        if contains_cr_or_lf(data.as_bytes()) || is_reserved_keyword(&data) {
            return Err(ObjectError::InvalidCustomData(data));
        }
        Ok(Self {
            kind: PayloadKind::Custom,
            data,
        })
    }

    /// Classify a keyword read off the wire. `COMMAND` and `VALUE` match
    /// ignoring ASCII case; anything else is kept verbatim as custom text.
    pub fn from_keyword(keyword: &str) -> Result<Self, ObjectError> {
        if keyword.eq_ignore_ascii_case(COMMAND_KEYWORD) {
            Ok(Self::command())
        } else if keyword.eq_ignore_ascii_case(VALUE_KEYWORD) {
            Ok(Self::value())
        } else {
            Self::custom(keyword)
        }
    }

    #[inline]
    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    /// The keyword, or the custom text.
    #[inline]
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Typed message body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Command(Command),
    Value(Value),
}

impl Body {
    #[inline]
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Body::Command(c) => Some(c),
            Body::Value(_) => None,
        }
    }

    #[inline]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Body::Value(v) => Some(v),
            Body::Command(_) => None,
        }
    }

    fn object(&self) -> &dyn Object {
        match self {
            Body::Command(c) => c,
            Body::Value(v) => v,
        }
    }
}

/// A request or response.
///
/// A body is present exactly when the payload kind is `Command` or `Value`,
/// and its type always matches the payload kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    kind: MessageKind,
    id: u64,
    payload: Payload,
    body: Option<Body>,
}

impl Message {
    /// Create a message, checking that the body agrees with the payload kind.
    pub fn new(
        kind: MessageKind,
        id: u64,
        payload: Payload,
        body: Option<Body>,
    ) -> Result<Self, ObjectError> {
        match (payload.kind(), &body) {
            (PayloadKind::Command, Some(Body::Command(_)))
            | (PayloadKind::Value, Some(Body::Value(_)))
            | (PayloadKind::Custom, None) => Ok(Self {
                kind,
                id,
                payload,
                body,
            }),
            (payload_kind, _) => Err(ObjectError::BodyMismatch(payload_kind)),
        }
    }

    /// Create a request.
    #[inline]
    pub fn request(id: u64, payload: Payload, body: Option<Body>) -> Result<Self, ObjectError> {
        Self::new(MessageKind::Request, id, payload, body)
    }

    /// Create a response.
    #[inline]
    pub fn response(id: u64, payload: Payload, body: Option<Body>) -> Result<Self, ObjectError> {
        Self::new(MessageKind::Response, id, payload, body)
    }

    /// Create a message carrying a command.
    pub fn with_command(kind: MessageKind, id: u64, command: Command) -> Self {
        Self {
            kind,
            id,
            payload: Payload::command(),
            body: Some(Body::Command(command)),
        }
    }

    /// Create a message carrying a value.
    pub fn with_value(kind: MessageKind, id: u64, value: Value) -> Self {
        Self {
            kind,
            id,
            payload: Payload::value(),
            body: Some(Body::Value(value)),
        }
    }

    /// Create a message carrying custom text and no body.
    pub fn with_custom(
        kind: MessageKind,
        id: u64,
        text: impl Into<String>,
    ) -> Result<Self, ObjectError> {
        Ok(Self {
            kind,
            id,
            payload: Payload::custom(text)?,
            body: None,
        })
    }

    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    #[inline]
    pub fn is_request(&self) -> bool {
        self.kind == MessageKind::Request
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        self.kind == MessageKind::Response
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[inline]
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    #[inline]
    pub fn into_body(self) -> Option<Body> {
        self.body
    }

    /// Byte length of the encoded message.
    pub fn encoded_len(&self) -> usize {
        let mut itoa = itoa::Buffer::new();
        let header = self.kind.token().len()
            + 2
            + itoa.format(self.id).len()
            + 2
            + self.payload.data().len()
            + 2;
        header + self.body.as_ref().map_or(0, |b| b.object().encoded_len())
    }

    /// Append the encoded message to `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        let mut itoa = itoa::Buffer::new();
        buf.reserve(self.encoded_len());
        buf.put_slice(self.kind.token().as_bytes());
        buf.put_slice(CRLF);
        buf.put_slice(itoa.format(self.id).as_bytes());
        buf.put_slice(CRLF);
        buf.put_slice(self.payload.data().as_bytes());
        buf.put_slice(CRLF);
        if let Some(body) = &self.body {
            body.object().encode_into(buf);
        }
    }

    /// The encoded message.
    pub fn wire_form(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }
}
