//! Length-prefixed and aggregate objects.
//!
//! - Bulk String: `$<len>\r\n<bytes>\r\n`
//! - Bulk Error: `!<len>\r\n<bytes>\r\n`
//! - Tagged String: `=<len>\r\n<tag>:<value>\r\n` where `len` covers tag, separator, and value
//! - Array: `*<count>\r\n<elem>...`
//! - Command: `*<count>\r\n$<len>\r\n<NAME>\r\n<arg>...`
//!
//! Bulk payloads are binary safe: CR and LF may appear anywhere inside them.

use std::borrow::Cow;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::{
    ARRAY_LENGTH_MAX, ARRAY_PREFIX, ARRAY_SIZE_MAX, BULK_ERROR_PREFIX, BULK_SIZE_MAX,
    BULK_STRING_PREFIX, CRLF, TAGGED_STRING_ENCODING_LEN, TAGGED_STRING_PREFIX,
    TAGGED_STRING_SEPARATOR, TAGGED_STRING_SIZE_MAX, digits,
};
use crate::error::ObjectError;
use crate::simple::{SimpleError, SimpleString, check_size};
use crate::value::{Object, ObjectType, Value};

/// Write `<prefix><n>\r\n`.
#[inline]
fn put_header(buf: &mut BytesMut, prefix: u8, n: usize) {
    let mut itoa = itoa::Buffer::new();
    buf.put_u8(prefix);
    buf.put_slice(itoa.format(n).as_bytes());
    buf.put_slice(CRLF);
}

/// Length of `<prefix><n>\r\n`.
#[inline]
fn header_len(n: usize) -> usize {
    1 + digits(n) + 2
}

/// Write `<prefix><len>\r\n<data>\r\n`.
#[inline]
fn encode_bulk(buf: &mut BytesMut, prefix: u8, data: &[u8]) {
    buf.reserve(header_len(data.len()) + data.len() + 2);
    put_header(buf, prefix, data.len());
    buf.put_slice(data);
    buf.put_slice(CRLF);
}

// ============================================================================
// Bulk string / bulk error
// ============================================================================

/// Binary-safe string of up to 2MB: `$6\r\nfoobar\r\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkString {
    raw: Bytes,
}

impl BulkString {
    /// Create a bulk string by copying `data`.
    pub fn new(data: &[u8]) -> Result<Self, ObjectError> {
        check_size(ObjectType::BulkString, data.len(), BULK_SIZE_MAX)?;
        Ok(Self {
            raw: Bytes::copy_from_slice(data),
        })
    }

    /// Create a bulk string from its raw payload.
    pub fn from_bytes(raw: Bytes) -> Result<Self, ObjectError> {
        check_size(ObjectType::BulkString, raw.len(), BULK_SIZE_MAX)?;
        Ok(Self { raw })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The payload as text.
    #[inline]
    pub fn value(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

impl Object for BulkString {
    fn object_type(&self) -> ObjectType {
        ObjectType::BulkString
    }

    fn raw_payload(&self) -> Bytes {
        self.raw.clone()
    }

    fn encoded_len(&self) -> usize {
        header_len(self.raw.len()) + self.raw.len() + 2
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        encode_bulk(buf, BULK_STRING_PREFIX, &self.raw);
    }
}

/// Binary-safe error of up to 2MB: `!<len>\r\n<error>\r\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkError {
    raw: Bytes,
}

impl BulkError {
    pub fn new(data: &[u8]) -> Result<Self, ObjectError> {
        check_size(ObjectType::BulkError, data.len(), BULK_SIZE_MAX)?;
        Ok(Self {
            raw: Bytes::copy_from_slice(data),
        })
    }

    pub fn from_bytes(raw: Bytes) -> Result<Self, ObjectError> {
        check_size(ObjectType::BulkError, raw.len(), BULK_SIZE_MAX)?;
        Ok(Self { raw })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    #[inline]
    pub fn value(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

impl Object for BulkError {
    fn object_type(&self) -> ObjectType {
        ObjectType::BulkError
    }

    fn raw_payload(&self) -> Bytes {
        self.raw.clone()
    }

    fn encoded_len(&self) -> usize {
        header_len(self.raw.len()) + self.raw.len() + 2
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        encode_bulk(buf, BULK_ERROR_PREFIX, &self.raw);
    }
}

// ============================================================================
// Tagged string
// ============================================================================

/// String with a 3-byte encoding tag: `=10\r\nhex:ffffff\r\n`.
///
/// The raw payload is the value alone; the tag is exposed through
/// [`TaggedString::encoding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedString {
    encoding: [u8; TAGGED_STRING_ENCODING_LEN],
    raw: Bytes,
}

impl TaggedString {
    /// Create a tagged string from an encoding tag and value.
    pub fn new(encoding: &str, data: &[u8]) -> Result<Self, ObjectError> {
        Self::from_parts(encoding.as_bytes(), Bytes::copy_from_slice(data))
    }

    /// Create a tagged string from a raw tag and value payload.
    pub fn from_parts(encoding: &[u8], raw: Bytes) -> Result<Self, ObjectError> {
        let encoding: [u8; TAGGED_STRING_ENCODING_LEN] = encoding
            .try_into()
            .map_err(|_| ObjectError::EncodingLength(encoding.len()))?;
        check_size(
            ObjectType::TaggedString,
            Self::declared_len_for(raw.len()),
            TAGGED_STRING_SIZE_MAX,
        )?;
        Ok(Self { encoding, raw })
    }

    #[inline]
    fn declared_len_for(value_len: usize) -> usize {
        TAGGED_STRING_ENCODING_LEN + 1 + value_len
    }

    /// Length written in the frame header: tag, separator, and value.
    #[inline]
    pub fn declared_len(&self) -> usize {
        Self::declared_len_for(self.raw.len())
    }

    /// The encoding tag as text.
    #[inline]
    pub fn encoding(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.encoding)
    }

    #[inline]
    pub fn encoding_bytes(&self) -> &[u8; TAGGED_STRING_ENCODING_LEN] {
        &self.encoding
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The value as text.
    #[inline]
    pub fn value(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

impl Object for TaggedString {
    fn object_type(&self) -> ObjectType {
        ObjectType::TaggedString
    }

    fn raw_payload(&self) -> Bytes {
        self.raw.clone()
    }

    fn encoded_len(&self) -> usize {
        let len = self.declared_len();
        header_len(len) + len + 2
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        let len = self.declared_len();
        buf.reserve(header_len(len) + len + 2);
        put_header(buf, TAGGED_STRING_PREFIX, len);
        buf.put_slice(&self.encoding);
        buf.put_u8(TAGGED_STRING_SEPARATOR);
        buf.put_slice(&self.raw);
        buf.put_slice(CRLF);
    }
}

// ============================================================================
// Array
// ============================================================================

/// Validate element count and total frame size.
fn check_aggregate(
    kind: ObjectType,
    count: usize,
    payload_len: usize,
) -> Result<(), ObjectError> {
    if count > ARRAY_LENGTH_MAX {
        return Err(ObjectError::TooManyElements {
            len: count,
            max: ARRAY_LENGTH_MAX,
        });
    }
    check_size(kind, header_len(count) + payload_len, ARRAY_SIZE_MAX)
}

/// Ordered sequence of objects: `*2\r\n+OK\r\n+PONG\r\n`.
///
/// Holds at most 512 elements and encodes to at most 64MB.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    elements: Vec<Value>,
    payload_len: usize,
}

impl Array {
    /// Create an array from its elements.
    pub fn new(elements: Vec<Value>) -> Result<Self, ObjectError> {
        let payload_len = elements.iter().map(Object::encoded_len).sum();
        check_aggregate(ObjectType::Array, elements.len(), payload_len)?;
        Ok(Self {
            elements,
            payload_len,
        })
    }

    /// Create an array of simple strings.
    pub fn from_simple_strings(items: &[&str]) -> Result<Self, ObjectError> {
        let elements = items
            .iter()
            .map(|s| SimpleString::new(s).map(Value::SimpleString))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(elements)
    }

    /// Create an array of simple errors.
    pub fn from_simple_errors(items: &[&str]) -> Result<Self, ObjectError> {
        let elements = items
            .iter()
            .map(|s| SimpleError::new(s).map(Value::SimpleError))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(elements)
    }

    /// Create an array of bulk strings.
    pub fn from_bulk_strings(items: &[&[u8]]) -> Result<Self, ObjectError> {
        let elements = items
            .iter()
            .map(|s| BulkString::new(s).map(Value::BulkString))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(elements)
    }

    /// Create an array of bulk errors.
    pub fn from_bulk_errors(items: &[&[u8]]) -> Result<Self, ObjectError> {
        let elements = items
            .iter()
            .map(|s| BulkError::new(s).map(Value::BulkError))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(elements)
    }

    #[inline]
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    #[inline]
    pub fn into_elements(self) -> Vec<Value> {
        self.elements
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Object for Array {
    fn object_type(&self) -> ObjectType {
        ObjectType::Array
    }

    fn raw_payload(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.payload_len);
        for element in &self.elements {
            element.encode_into(&mut buf);
        }
        buf.freeze()
    }

    fn encoded_len(&self) -> usize {
        header_len(self.elements.len()) + self.payload_len
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        put_header(buf, ARRAY_PREFIX, self.elements.len());
        for element in &self.elements {
            element.encode_into(buf);
        }
    }
}

// ============================================================================
// Command
// ============================================================================

/// Recognized command names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Ping,
    Echo,
}

impl CommandName {
    /// Resolve a command name, ignoring ASCII case.
    pub fn parse(name: &[u8]) -> Option<Self> {
        if name.eq_ignore_ascii_case(b"ping") {
            Some(CommandName::Ping)
        } else if name.eq_ignore_ascii_case(b"echo") {
            Some(CommandName::Echo)
        } else {
            None
        }
    }

    /// Canonical upper-case spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandName::Ping => "PING",
            CommandName::Echo => "ECHO",
        }
    }

    #[inline]
    fn frame_len(self) -> usize {
        let len = self.as_str().len();
        header_len(len) + len + 2
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command: an array whose first element is a bulk string naming the
/// command, followed by its arguments.
///
/// `PING` with no arguments encodes as `*1\r\n$4\r\nPING\r\n`. The same
/// count and size ceilings as [`Array`] apply, counting the name.
///
/// The name is always written in upper case, so a decoded `ping` re-encodes
/// as `PING` and the wire form may differ from the bytes that were read.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: CommandName,
    args: Vec<Value>,
    payload_len: usize,
}

impl Command {
    /// Create a command from its name and arguments.
    pub fn new(name: CommandName, args: Vec<Value>) -> Result<Self, ObjectError> {
        let payload_len =
            name.frame_len() + args.iter().map(Object::encoded_len).sum::<usize>();
        check_aggregate(ObjectType::Command, args.len() + 1, payload_len)?;
        Ok(Self {
            name,
            args,
            payload_len,
        })
    }

    /// Create a command whose arguments are bulk strings.
    pub fn from_bulk_strings(name: CommandName, args: &[&[u8]]) -> Result<Self, ObjectError> {
        let args = args
            .iter()
            .map(|a| BulkString::new(a).map(Value::BulkString))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, args)
    }

    /// Create a command from a full argument vector whose first entry is the name.
    pub fn from_args(args: &[&[u8]]) -> Result<Self, ObjectError> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| ObjectError::UnrecognizedCommand(String::new()))?;
        let name = CommandName::parse(name).ok_or_else(|| {
            ObjectError::UnrecognizedCommand(String::from_utf8_lossy(name).into_owned())
        })?;
        Self::from_bulk_strings(name, rest)
    }

    #[inline]
    pub fn name(&self) -> CommandName {
        self.name
    }

    /// Arguments following the command name.
    #[inline]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    #[inline]
    pub fn into_args(self) -> Vec<Value> {
        self.args
    }

    #[inline]
    fn encode_payload(&self, buf: &mut BytesMut) {
        encode_bulk(buf, BULK_STRING_PREFIX, self.name.as_str().as_bytes());
        for arg in &self.args {
            arg.encode_into(buf);
        }
    }
}

impl Object for Command {
    fn object_type(&self) -> ObjectType {
        ObjectType::Command
    }

    fn raw_payload(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.payload_len);
        self.encode_payload(&mut buf);
        buf.freeze()
    }

    fn encoded_len(&self) -> usize {
        header_len(self.args.len() + 1) + self.payload_len
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        put_header(buf, ARRAY_PREFIX, self.args.len() + 1);
        self.encode_payload(buf);
    }
}
