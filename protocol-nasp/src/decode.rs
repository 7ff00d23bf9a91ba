//! Decoding of fully buffered NASP frames and messages.
//!
//! A [`Decoder`] is a cursor over one immutable buffer. Every read advances the
//! cursor; nothing is rewound, and the first failure aborts the decode.
//! Payloads are sliced out of the input buffer without copying.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::aggregate::{Array, BulkError, BulkString, Command, CommandName, TaggedString};
use crate::constants::{
    ARRAY_LENGTH_MAX, ARRAY_PREFIX, BULK_SIZE_MAX, CRLF, MESSAGE_SIZE_MAX,
    TAGGED_STRING_ENCODING_LEN, TAGGED_STRING_SEPARATOR, TAGGED_STRING_SIZE_MAX,
};
use crate::error::{DecodeError, ObjectError};
use crate::message::{Body, Message, MessageKind, Payload, PayloadKind};
use crate::simple::{Float, Integer, SimpleError, SimpleString, contains_cr_or_lf};
use crate::value::{ObjectType, Value};

/// Default maximum nesting depth of arrays and commands.
///
/// Bounds recursion so that a hostile frame of nested `*1\r\n` headers cannot
/// exhaust the stack.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Configuration for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum nesting depth of arrays and commands.
    pub max_depth: usize,
    /// Maximum number of bytes accepted by [`Decoder::decode_message`].
    pub max_message_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    /// Create decode options with default values.
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_message_len: MESSAGE_SIZE_MAX,
        }
    }

    /// Set the maximum nesting depth.
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum message length.
    pub const fn max_message_len(mut self, len: usize) -> Self {
        self.max_message_len = len;
        self
    }
}

/// Decode one value from the start of `data`.
///
/// Bytes after the first complete frame are ignored.
pub fn decode_value(data: &[u8]) -> Result<Value, DecodeError> {
    Decoder::from_slice(data).decode_value()
}

/// Decode one request or response from the start of `data`.
///
/// Bytes after the first complete message are ignored.
pub fn decode_message(data: &[u8]) -> Result<Message, DecodeError> {
    Decoder::from_slice(data).decode_message()
}

/// Cursor over a buffer of NASP frames.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use protocol_nasp::{Decoder, Value};
///
/// let mut decoder = Decoder::new(Bytes::from_static(b"+OK\r\n:42\r\n"));
/// assert_eq!(decoder.decode_value().unwrap(), Value::simple_string("OK").unwrap());
/// assert_eq!(decoder.decode_value().unwrap(), Value::integer(42).unwrap());
/// assert_eq!(decoder.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    data: Bytes,
    pos: usize,
    depth: usize,
    options: DecodeOptions,
}

impl Decoder {
    /// Create a decoder over `data` with default options.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
            options: DecodeOptions::new(),
        }
    }

    /// Create a decoder over a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Replace the decode options.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// The options this decoder enforces.
    #[inline]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Decode the next value, dispatching on its prefix byte.
    pub fn decode_value(&mut self) -> Result<Value, DecodeError> {
        let result = self.read_value();
        self.log_failure(&result, "value");
        result
    }

    /// Decode the next frame as a command.
    ///
    /// The frame must be an array whose first element is a bulk string naming
    /// a recognized command.
    pub fn decode_command(&mut self) -> Result<Command, DecodeError> {
        let result = self.read_command();
        self.log_failure(&result, "command");
        result
    }

    /// Decode a request or response envelope and its body.
    pub fn decode_message(&mut self) -> Result<Message, DecodeError> {
        let result = self.read_message();
        self.log_failure(&result, "message");
        result
    }

    fn log_failure<T>(&self, result: &Result<T, DecodeError>, what: &str) {
        if let Err(e) = result {
            debug!(error = %e, position = self.pos, "failed to decode {}", what);
        }
    }

    // ========================================================================
    // Messages
    // ========================================================================

    fn read_message(&mut self) -> Result<Message, DecodeError> {
        let len = self.remaining();
        if len > self.options.max_message_len {
            return Err(DecodeError::MessageTooLarge {
                len,
                max: self.options.max_message_len,
            });
        }

        let token = self.read_line()?;
        let kind = MessageKind::parse(&token).ok_or_else(|| {
            DecodeError::UnrecognizedMessageKind(String::from_utf8_lossy(&token).into_owned())
        })?;
        let id = parse_decimal(&self.read_line()?)?;
        let keyword = self.read_line()?;
        let payload = Payload::from_keyword(&String::from_utf8_lossy(&keyword))?;

        trace!(
            kind = kind.token(),
            id,
            payload = payload.data(),
            "decoded message header"
        );

        let body = match payload.kind() {
            PayloadKind::Command => Some(Body::Command(self.read_command()?)),
            PayloadKind::Value => Some(Body::Value(self.read_value()?)),
            PayloadKind::Custom => None,
        };
        Ok(Message::new(kind, id, payload, body)?)
    }

    fn read_command(&mut self) -> Result<Command, DecodeError> {
        let prefix = self.read_prefix()?;
        if prefix != ARRAY_PREFIX {
            return Err(DecodeError::UnrecognizedObjectType(prefix));
        }

        let mut elements = self.read_array()?.into_elements().into_iter();
        let name = match elements.next() {
            Some(Value::BulkString(name)) => name,
            Some(other) => return Err(DecodeError::UnrecognizedObjectType(other.prefix())),
            None => return Err(DecodeError::UnrecognizedObjectType(ARRAY_PREFIX)),
        };
        let name = CommandName::parse(name.as_bytes()).ok_or_else(|| {
            DecodeError::UnrecognizedCommand(name.value().into_owned())
        })?;
        Ok(Command::new(name, elements.collect())?)
    }

    // ========================================================================
    // Values
    // ========================================================================

    fn read_value(&mut self) -> Result<Value, DecodeError> {
        let prefix = self.read_prefix()?;
        let kind = ObjectType::from_prefix(prefix)
            .ok_or(DecodeError::UnrecognizedObjectType(prefix))?;
        let value = match kind {
            ObjectType::SimpleString => {
                let line = self.read_simple_line(kind)?;
                Value::SimpleString(SimpleString::from_bytes(line)?)
            }
            ObjectType::SimpleError => {
                let line = self.read_simple_line(kind)?;
                Value::SimpleError(SimpleError::from_bytes(line)?)
            }
            ObjectType::Integer => Value::Integer(Integer::from_bytes(self.read_line()?)?),
            ObjectType::Float => Value::Float(Float::from_bytes(self.read_line()?)?),
            ObjectType::BulkString => {
                let data = self.read_bulk(kind)?;
                Value::BulkString(BulkString::from_bytes(data)?)
            }
            ObjectType::BulkError => {
                let data = self.read_bulk(kind)?;
                Value::BulkError(BulkError::from_bytes(data)?)
            }
            ObjectType::TaggedString => Value::TaggedString(self.read_tagged_string()?),
            // Commands share the array prefix and are only read through `read_command`.
            ObjectType::Array | ObjectType::Command => Value::Array(self.read_array()?),
        };
        Ok(value)
    }

    /// Line of a simple string or error, which may not carry a raw CR or LF.
    fn read_simple_line(&mut self, kind: ObjectType) -> Result<Bytes, DecodeError> {
        let line = self.read_line()?;
        if contains_cr_or_lf(&line) {
            return Err(DecodeError::ContainsCrLf(kind));
        }
        Ok(line)
    }

    fn read_bulk(&mut self, kind: ObjectType) -> Result<Bytes, DecodeError> {
        let len = self.read_length()?;
        if len > BULK_SIZE_MAX {
            return Err(ObjectError::SizeExceeded {
                kind,
                len,
                max: BULK_SIZE_MAX,
            }
            .into());
        }
        let data = self.take(len)?;
        self.read_terminator()?;
        Ok(data)
    }

    fn read_tagged_string(&mut self) -> Result<TaggedString, DecodeError> {
        let len = self.read_length()?;
        if len > TAGGED_STRING_SIZE_MAX {
            return Err(ObjectError::SizeExceeded {
                kind: ObjectType::TaggedString,
                len,
                max: TAGGED_STRING_SIZE_MAX,
            }
            .into());
        }

        let region = self.take(len)?;
        let tag_len = memchr::memchr(TAGGED_STRING_SEPARATOR, &region)
            .ok_or(DecodeError::EncodingLengthMismatch(len))?;
        if tag_len != TAGGED_STRING_ENCODING_LEN {
            return Err(DecodeError::EncodingLengthMismatch(tag_len));
        }
        self.read_terminator()?;

        let tagged = TaggedString::from_parts(
            &region[..TAGGED_STRING_ENCODING_LEN],
            region.slice(TAGGED_STRING_ENCODING_LEN + 1..),
        )?;
        Ok(tagged)
    }

    fn read_array(&mut self) -> Result<Array, DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::NestingTooDeep(self.depth + 1));
        }

        let count = self.read_length()?;
        if count > ARRAY_LENGTH_MAX {
            return Err(ObjectError::TooManyElements {
                len: count,
                max: ARRAY_LENGTH_MAX,
            }
            .into());
        }

        self.depth += 1;
        let elements = self.read_elements(count);
        self.depth -= 1;

        Ok(Array::new(elements?)?)
    }

    fn read_elements(&mut self, count: usize) -> Result<Vec<Value>, DecodeError> {
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.read_value()?);
        }
        Ok(elements)
    }

    // ========================================================================
    // Cursor primitives
    // ========================================================================

    fn read_prefix(&mut self) -> Result<u8, DecodeError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Bytes up to the next CRLF; the cursor moves past the CRLF.
    fn read_line(&mut self) -> Result<Bytes, DecodeError> {
        let start = self.pos;
        let end = memchr::memmem::find(&self.data[start..], CRLF)
            .map(|offset| start + offset)
            .ok_or(DecodeError::UnexpectedEof)?;
        self.pos = end + CRLF.len();
        Ok(self.data.slice(start..end))
    }

    /// A length or count header line.
    fn read_length(&mut self) -> Result<usize, DecodeError> {
        let n = parse_decimal(&self.read_line()?)?;
        usize::try_from(n).map_err(|_| DecodeError::InvalidInteger("integer overflow".to_string()))
    }

    /// Exactly `len` bytes of payload.
    fn take(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        let data = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(data)
    }

    /// CRLF immediately following a length-prefixed payload.
    fn read_terminator(&mut self) -> Result<(), DecodeError> {
        if !self.data[self.pos..].starts_with(CRLF) {
            return Err(DecodeError::MissingTerminator);
        }
        self.pos += CRLF.len();
        Ok(())
    }
}

/// Parse an unsigned decimal header: digits only, no sign, no whitespace.
fn parse_decimal(line: &[u8]) -> Result<u64, DecodeError> {
    if line.is_empty() {
        return Err(DecodeError::InvalidInteger("empty integer".to_string()));
    }

    // u64::MAX is 20 digits; anything longer cannot fit.
    if line.len() > 20 {
        return Err(DecodeError::InvalidInteger("integer too large".to_string()));
    }

    let mut result = 0u64;
    for &byte in line {
        if !byte.is_ascii_digit() {
            return Err(DecodeError::InvalidInteger(
                "non-digit character".to_string(),
            ));
        }
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(u64::from(byte - b'0')))
            .ok_or_else(|| DecodeError::InvalidInteger("integer overflow".to_string()))?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Data, Object};

    #[test]
    fn test_decode_simple_string() {
        let v = decode_value(b"+OK\r\n").unwrap();
        assert_eq!(v, Value::simple_string("OK").unwrap());
        assert_eq!(
            decode_value(b"-ERR boom\r\n").unwrap(),
            Value::simple_error("ERR boom").unwrap()
        );
    }

    #[test]
    fn test_decode_simple_rejects_cr_lf() {
        assert_eq!(
            decode_value(b"+O\rK\r\n"),
            Err(DecodeError::ContainsCrLf(ObjectType::SimpleString))
        );
        assert_eq!(
            decode_value(b"+O\nK\r\n"),
            Err(DecodeError::ContainsCrLf(ObjectType::SimpleString))
        );
        assert_eq!(
            decode_value(b"-OK\r\r\n"),
            Err(DecodeError::ContainsCrLf(ObjectType::SimpleError))
        );
    }

    #[test]
    fn test_decode_simple_ceiling() {
        let mut frame = vec![b'+'];
        frame.extend_from_slice(&[b'x'; 513]);
        frame.extend_from_slice(b"\r\n");
        assert!(matches!(
            decode_value(&frame),
            Err(DecodeError::Object(ObjectError::SizeExceeded { .. }))
        ));
    }

    #[test]
    fn test_decode_integer() {
        let v = decode_value(b":1000\r\n").unwrap();
        assert_eq!(v.data(), Ok(Data::Integer(1000)));

        let v = decode_value(b":-42\r\n").unwrap();
        assert_eq!(v.data(), Ok(Data::Integer(-42)));
    }

    #[test]
    fn test_decode_integer_keeps_text() {
        let v = decode_value(b":+123\r\n").unwrap();
        assert_eq!(v.raw_payload(), Bytes::from_static(b"+123"));
        assert_eq!(v.data(), Ok(Data::Integer(123)));
        assert_eq!(v.wire_form(), Bytes::from_static(b":+123\r\n"));
    }

    #[test]
    fn test_decode_integer_malformed_text() {
        // Tolerated while decoding; fails once the number is requested.
        let v = decode_value(b":abc\r\n").unwrap();
        assert!(matches!(v.data(), Err(ObjectError::InvalidNumber(_))));
    }

    #[test]
    fn test_decode_integer_out_of_range() {
        assert!(matches!(
            decode_value(b":9007199254740992\r\n"),
            Err(DecodeError::Object(ObjectError::NumberOutOfRange(_)))
        ));
    }

    #[test]
    fn test_decode_float() {
        let v = decode_value(b";2.75\r\n").unwrap();
        assert_eq!(v.data(), Ok(Data::Float(2.75)));

        let v = decode_value(b";1e3\r\n").unwrap();
        assert_eq!(v.raw_payload(), Bytes::from_static(b"1e3"));
        assert_eq!(v.data(), Ok(Data::Float(1000.0)));
    }

    #[test]
    fn test_decode_bulk_string() {
        let v = decode_value(b"$6\r\nfoobar\r\n").unwrap();
        assert_eq!(v, Value::bulk_string(b"foobar").unwrap());

        let v = decode_value(b"$0\r\n\r\n").unwrap();
        assert_eq!(v, Value::bulk_string(b"").unwrap());
    }

    #[test]
    fn test_decode_bulk_binary_safe() {
        let v = decode_value(b"$6\r\na\r\nb\rc\r\n").unwrap();
        assert_eq!(v.as_bulk_string().unwrap().as_bytes(), b"a\r\nb\rc");
    }

    #[test]
    fn test_decode_bulk_error() {
        let v = decode_value(b"!3\r\nERR\r\n").unwrap();
        assert_eq!(v, Value::bulk_error(b"ERR").unwrap());
        assert!(v.is_error());
    }

    #[test]
    fn test_decode_bulk_missing_terminator() {
        assert_eq!(
            decode_value(b"$3\r\nfoobar\r\n"),
            Err(DecodeError::MissingTerminator)
        );
        assert_eq!(decode_value(b"$3\r\nfoo"), Err(DecodeError::MissingTerminator));
    }

    #[test]
    fn test_decode_bulk_truncated() {
        assert_eq!(decode_value(b"$10\r\nfoo\r\n"), Err(DecodeError::UnexpectedEof));
        assert_eq!(decode_value(b"$3"), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_bulk_declared_len_checked_first() {
        // Rejected from the header alone; no payload follows.
        assert_eq!(
            decode_value(b"$2097153\r\n"),
            Err(DecodeError::Object(ObjectError::SizeExceeded {
                kind: ObjectType::BulkString,
                len: BULK_SIZE_MAX + 1,
                max: BULK_SIZE_MAX,
            }))
        );
    }

    #[test]
    fn test_decode_invalid_length() {
        assert!(matches!(
            decode_value(b"$-1\r\n"),
            Err(DecodeError::InvalidInteger(_))
        ));
        assert!(matches!(
            decode_value(b"$\r\n"),
            Err(DecodeError::InvalidInteger(_))
        ));
        assert!(matches!(
            decode_value(b"*99999999999999999999\r\n"),
            Err(DecodeError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_decode_tagged_string() {
        let v = decode_value(b"=10\r\nhex:ffffff\r\n").unwrap();
        match v {
            Value::TaggedString(t) => {
                assert_eq!(t.encoding(), "hex");
                assert_eq!(t.value(), "ffffff");
            }
            other => panic!("expected tagged string, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_tagged_string_value_with_separator() {
        let v = decode_value(b"=7\r\ntxt:a:b\r\n").unwrap();
        assert_eq!(v.as_text().as_deref(), Some("a:b"));
    }

    #[test]
    fn test_decode_tagged_string_tag_length() {
        assert_eq!(
            decode_value(b"=9\r\nhx:ffffff\r\n"),
            Err(DecodeError::EncodingLengthMismatch(2))
        );
        assert_eq!(
            decode_value(b"=11\r\nutf8:ffffff\r\n"),
            Err(DecodeError::EncodingLengthMismatch(4))
        );
        assert_eq!(
            decode_value(b"=6\r\nffffff\r\n"),
            Err(DecodeError::EncodingLengthMismatch(6))
        );
    }

    #[test]
    fn test_decode_tagged_string_short_without_separator() {
        assert_eq!(
            decode_value(b"=3\r\nabc\r\n"),
            Err(DecodeError::EncodingLengthMismatch(3))
        );
        assert_eq!(
            decode_value(b"=0\r\n\r\n"),
            Err(DecodeError::EncodingLengthMismatch(0))
        );
        assert_eq!(
            decode_value(b"=2\r\nab\r\n"),
            Err(DecodeError::EncodingLengthMismatch(2))
        );
    }

    #[test]
    fn test_decode_tagged_string_tag_only() {
        let v = decode_value(b"=4\r\nbin:\r\n").unwrap();
        assert_eq!(v.as_text().as_deref(), Some(""));
    }

    #[test]
    fn test_decode_tagged_string_missing_terminator() {
        assert_eq!(
            decode_value(b"=5\r\ntxt:abc\r\n"),
            Err(DecodeError::MissingTerminator)
        );
    }

    #[test]
    fn test_decode_array() {
        let v = decode_value(b"*3\r\n$5\r\napple\r\n$7\r\nbannana\r\n$6\r\norange\r\n").unwrap();
        let expected = vec![
            Value::bulk_string(b"apple").unwrap(),
            Value::bulk_string(b"bannana").unwrap(),
            Value::bulk_string(b"orange").unwrap(),
        ];
        assert_eq!(v.as_array().unwrap().elements(), &expected[..]);
    }

    #[test]
    fn test_decode_nested_array() {
        let v = decode_value(b"*2\r\n*1\r\n:1\r\n+OK\r\n").unwrap();
        let outer = v.as_array().unwrap();
        assert_eq!(outer.len(), 2);
        assert_eq!(outer.elements()[0].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_decode_array_fail_fast() {
        assert_eq!(
            decode_value(b"*2\r\n+OK\r\n?\r\n"),
            Err(DecodeError::UnrecognizedObjectType(b'?'))
        );
        assert_eq!(decode_value(b"*2\r\n+OK\r\n"), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_array_count_checked_first() {
        assert_eq!(
            decode_value(b"*513\r\n"),
            Err(DecodeError::Object(ObjectError::TooManyElements {
                len: 513,
                max: ARRAY_LENGTH_MAX,
            }))
        );
    }

    #[test]
    fn test_decode_nesting_limit() {
        let options = DecodeOptions::new().max_depth(2);

        let mut decoder = Decoder::from_slice(b"*1\r\n*0\r\n").with_options(options);
        assert!(decoder.decode_value().is_ok());

        let mut decoder = Decoder::from_slice(b"*1\r\n*1\r\n*0\r\n").with_options(options);
        assert_eq!(decoder.decode_value(), Err(DecodeError::NestingTooDeep(3)));
    }

    #[test]
    fn test_decode_unrecognized_prefix() {
        assert_eq!(
            decode_value(b"?foo\r\n"),
            Err(DecodeError::UnrecognizedObjectType(b'?'))
        );
        assert_eq!(decode_value(b""), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_command() {
        let mut decoder = Decoder::from_slice(b"*2\r\n$4\r\necho\r\n$2\r\nhi\r\n");
        let cmd = decoder.decode_command().unwrap();
        assert_eq!(cmd.name(), CommandName::Echo);
        assert_eq!(cmd.args(), &[Value::bulk_string(b"hi").unwrap()]);
        // Name is re-encoded in canonical case.
        assert_eq!(
            cmd.wire_form(),
            Bytes::from_static(b"*2\r\n$4\r\nECHO\r\n$2\r\nhi\r\n")
        );
    }

    #[test]
    fn test_decode_command_errors() {
        let decode = |data: &[u8]| Decoder::from_slice(data).decode_command();

        assert_eq!(
            decode(b"*1\r\n$3\r\nGET\r\n"),
            Err(DecodeError::UnrecognizedCommand("GET".into()))
        );
        assert_eq!(
            decode(b"*1\r\n+PING\r\n"),
            Err(DecodeError::UnrecognizedObjectType(b'+'))
        );
        assert_eq!(
            decode(b"+PING\r\n"),
            Err(DecodeError::UnrecognizedObjectType(b'+'))
        );
        assert_eq!(
            decode(b"*0\r\n"),
            Err(DecodeError::UnrecognizedObjectType(b'*'))
        );
    }

    #[test]
    fn test_decode_message_custom() {
        let msg = decode_message(b"REQ\r\n1\r\nPING\r\n").unwrap();
        assert!(msg.is_request());
        assert_eq!(msg.id(), 1);
        assert_eq!(msg.payload().kind(), PayloadKind::Custom);
        assert_eq!(msg.payload().data(), "PING");
        assert!(msg.body().is_none());
    }

    #[test]
    fn test_decode_message_custom_keeps_case() {
        let msg = decode_message(b"res\r\n9\r\nPong\r\n").unwrap();
        assert!(msg.is_response());
        assert_eq!(msg.payload().data(), "Pong");
    }

    #[test]
    fn test_decode_message_command() {
        let msg = decode_message(b"REQ\r\n2\r\nCOMMAND\r\n*1\r\n$4\r\nPING\r\n").unwrap();
        assert_eq!(msg.id(), 2);
        assert_eq!(msg.payload().kind(), PayloadKind::Command);
        let cmd = msg.body().and_then(Body::as_command).unwrap();
        assert_eq!(cmd.name(), CommandName::Ping);
        assert!(cmd.args().is_empty());
    }

    #[test]
    fn test_decode_message_value() {
        let msg = decode_message(b"RES\r\n2\r\nvalue\r\n+PONG\r\n").unwrap();
        assert!(msg.is_response());
        assert_eq!(msg.payload().kind(), PayloadKind::Value);
        assert_eq!(
            msg.body().and_then(Body::as_value),
            Some(&Value::simple_string("PONG").unwrap())
        );
    }

    #[test]
    fn test_decode_message_errors() {
        assert_eq!(
            decode_message(b"REP\r\n1\r\nPING\r\n"),
            Err(DecodeError::UnrecognizedMessageKind("REP".into()))
        );
        assert!(matches!(
            decode_message(b"REQ\r\nabc\r\nPING\r\n"),
            Err(DecodeError::InvalidInteger(_))
        ));
        assert_eq!(
            decode_message(b"REQ\r\n1\r\nCOMMAND\r\n*1\r\n$3\r\nGET\r\n"),
            Err(DecodeError::UnrecognizedCommand("GET".into()))
        );
        assert_eq!(
            decode_message(b"REQ\r\n1\r\nVALUE\r\n"),
            Err(DecodeError::UnexpectedEof)
        );
        assert_eq!(decode_message(b"REQ\r\n1"), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_message_too_large() {
        let options = DecodeOptions::new().max_message_len(8);
        let mut decoder = Decoder::from_slice(b"REQ\r\n1\r\nPING\r\n").with_options(options);
        assert_eq!(
            decoder.decode_message(),
            Err(DecodeError::MessageTooLarge { len: 14, max: 8 })
        );
        assert_eq!(decoder.position(), 0);
    }

    #[test]
    fn test_decode_message_custom_rejects_bare_cr() {
        assert_eq!(
            decode_message(b"REQ\r\n1\r\nPI\rNG\r\n"),
            Err(DecodeError::Object(ObjectError::InvalidCustomData(
                "PI\rNG".into()
            )))
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut decoder = Decoder::from_slice(b"REQ\r\n1\r\nPING\r\nextra");
        decoder.decode_message().unwrap();
        assert_eq!(decoder.position(), 14);
        assert_eq!(decoder.remaining(), 5);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(b"0"), Ok(0));
        assert_eq!(parse_decimal(b"1234"), Ok(1234));
        assert!(parse_decimal(b"").is_err());
        assert!(parse_decimal(b"+1").is_err());
        assert!(parse_decimal(b"1 ").is_err());
        assert_eq!(parse_decimal(b"18446744073709551615"), Ok(u64::MAX));
        assert!(parse_decimal(b"18446744073709551616").is_err());
        assert!(parse_decimal(b"123456789012345678901").is_err());
    }

    #[test]
    fn test_options() {
        let options = DecodeOptions::default();
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.max_message_len, MESSAGE_SIZE_MAX);

        let options = DecodeOptions::new().max_depth(4).max_message_len(1024);
        assert_eq!(options.max_depth, 4);
        assert_eq!(options.max_message_len, 1024);

        let decoder = Decoder::from_slice(b"").with_options(options);
        assert_eq!(decoder.options().max_depth, 4);
        assert_eq!(decoder.options().max_message_len, 1024);
    }
}
