//! Line-framed objects: simple strings, simple errors, integers, and floats.
//!
//! Each of these is written as `<prefix><payload>\r\n`:
//! - Simple String: `+OK\r\n`
//! - Simple Error: `-ERR unknown\r\n`
//! - Integer: `:1000\r\n`
//! - Float: `;3.14\r\n`

use std::borrow::Cow;
use std::num::IntErrorKind;

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::{
    CRLF, FLOAT_PREFIX, INTEGER_MAGNITUDE_MAX, INTEGER_PREFIX, SIMPLE_ERROR_PREFIX,
    SIMPLE_SIZE_MAX, SIMPLE_STRING_PREFIX,
};
use crate::error::ObjectError;
use crate::value::{Object, ObjectType};

/// Fail with `SizeExceeded` if `len` is over `max`.
#[inline]
pub(crate) fn check_size(kind: ObjectType, len: usize, max: usize) -> Result<(), ObjectError> {
    if len > max {
        return Err(ObjectError::SizeExceeded { kind, len, max });
    }
    Ok(())
}

/// Returns true if `data` contains a raw CR or LF byte.
#[inline]
pub(crate) fn contains_cr_or_lf(data: &[u8]) -> bool {
    memchr::memchr2(b'\r', b'\n', data).is_some()
}

/// Write `<prefix><payload>\r\n`.
#[inline]
fn encode_line(buf: &mut BytesMut, prefix: u8, payload: &[u8]) {
    buf.reserve(1 + payload.len() + 2);
    buf.put_u8(prefix);
    buf.put_slice(payload);
    buf.put_slice(CRLF);
}

fn validate_simple(kind: ObjectType, raw: &[u8]) -> Result<(), ObjectError> {
    check_size(kind, raw.len(), SIMPLE_SIZE_MAX)?;
    if contains_cr_or_lf(raw) {
        return Err(ObjectError::ContainsCrLf(kind));
    }
    Ok(())
}

// ============================================================================
// Simple string / simple error
// ============================================================================

/// Short text status: `+OK\r\n`. At most 512 bytes, no CR or LF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleString {
    raw: Bytes,
}

impl SimpleString {
    /// Create a simple string from text.
    pub fn new(text: &str) -> Result<Self, ObjectError> {
        Self::from_bytes(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Create a simple string from its raw payload.
    pub fn from_bytes(raw: Bytes) -> Result<Self, ObjectError> {
        validate_simple(ObjectType::SimpleString, &raw)?;
        Ok(Self { raw })
    }

    /// The payload bytes.
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

impl Object for SimpleString {
    fn object_type(&self) -> ObjectType {
        ObjectType::SimpleString
    }

    fn raw_payload(&self) -> Bytes {
        self.raw.clone()
    }

    fn encoded_len(&self) -> usize {
        1 + self.raw.len() + 2
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        encode_line(buf, SIMPLE_STRING_PREFIX, &self.raw);
    }
}

/// Short error text: `-ERR unknown\r\n`. At most 512 bytes, no CR or LF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleError {
    raw: Bytes,
}

impl SimpleError {
    /// Create a simple error from text.
    pub fn new(text: &str) -> Result<Self, ObjectError> {
        Self::from_bytes(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Create a simple error from its raw payload.
    pub fn from_bytes(raw: Bytes) -> Result<Self, ObjectError> {
        validate_simple(ObjectType::SimpleError, &raw)?;
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

impl Object for SimpleError {
    fn object_type(&self) -> ObjectType {
        ObjectType::SimpleError
    }

    fn raw_payload(&self) -> Bytes {
        self.raw.clone()
    }

    fn encoded_len(&self) -> usize {
        1 + self.raw.len() + 2
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        encode_line(buf, SIMPLE_ERROR_PREFIX, &self.raw);
    }
}

// ============================================================================
// Integer
// ============================================================================

/// Integer: `:1000\r\n`.
///
/// The textual representation is kept verbatim, so `:+123\r\n` re-encodes as
/// `+123` while [`Integer::value`] yields `123`. Text that is not an integer
/// is accepted at construction and reported by [`Integer::value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integer {
    raw: Bytes,
    value: Option<i64>,
}

impl Integer {
    /// Create an integer from a number.
    pub fn new(n: i64) -> Result<Self, ObjectError> {
        if n.unsigned_abs() > INTEGER_MAGNITUDE_MAX as u64 {
            return Err(ObjectError::NumberOutOfRange(n.to_string()));
        }
        let mut buf = itoa::Buffer::new();
        Ok(Self {
            raw: Bytes::copy_from_slice(buf.format(n).as_bytes()),
            value: Some(n),
        })
    }

    /// Create an integer from its textual representation.
    pub fn from_text(text: &str) -> Result<Self, ObjectError> {
        Self::from_bytes(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Create an integer from its raw payload.
    pub fn from_bytes(raw: Bytes) -> Result<Self, ObjectError> {
        let value = match std::str::from_utf8(&raw).map(str::parse::<i64>) {
            Ok(Ok(n)) if n.unsigned_abs() > INTEGER_MAGNITUDE_MAX as u64 => {
                return Err(ObjectError::NumberOutOfRange(n.to_string()));
            }
            Ok(Ok(n)) => Some(n),
            Ok(Err(e))
                if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) =>
            {
                return Err(ObjectError::NumberOutOfRange(
                    String::from_utf8_lossy(&raw).into_owned(),
                ));
            }
            _ => None,
        };
        Ok(Self { raw, value })
    }

    /// The original textual representation.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The parsed value.
    pub fn value(&self) -> Result<i64, ObjectError> {
        self.value
            .ok_or_else(|| ObjectError::InvalidNumber(String::from_utf8_lossy(&self.raw).into()))
    }
}

impl Object for Integer {
    fn object_type(&self) -> ObjectType {
        ObjectType::Integer
    }

    fn raw_payload(&self) -> Bytes {
        self.raw.clone()
    }

    fn encoded_len(&self) -> usize {
        1 + self.raw.len() + 2
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        encode_line(buf, INTEGER_PREFIX, &self.raw);
    }
}

// ============================================================================
// Float
// ============================================================================

/// Float: `;3.14\r\n`.
///
/// Like [`Integer`], the original text (exponent notation, leading `+`) is
/// preserved alongside the parsed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Float {
    raw: Bytes,
    value: Option<f64>,
}

impl Float {
    /// Create a float from a number. NaN and infinities are rejected.
    pub fn new(n: f64) -> Result<Self, ObjectError> {
        if n.is_nan() {
            return Err(ObjectError::InvalidNumber(n.to_string()));
        }
        if n.is_infinite() {
            return Err(ObjectError::NumberOutOfRange(n.to_string()));
        }
        let mut buf = ryu::Buffer::new();
        Ok(Self {
            raw: Bytes::copy_from_slice(buf.format_finite(n).as_bytes()),
            value: Some(n),
        })
    }

    /// Create a float from its textual representation.
    pub fn from_text(text: &str) -> Result<Self, ObjectError> {
        Self::from_bytes(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Create a float from its raw payload.
    pub fn from_bytes(raw: Bytes) -> Result<Self, ObjectError> {
        let value = match std::str::from_utf8(&raw).map(str::parse::<f64>) {
            Ok(Ok(n)) if n.is_infinite() => {
                return Err(ObjectError::NumberOutOfRange(
                    String::from_utf8_lossy(&raw).into_owned(),
                ));
            }
            Ok(Ok(n)) if !n.is_nan() => Some(n),
            _ => None,
        };
        Ok(Self { raw, value })
    }

    /// The original textual representation.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The parsed value.
    pub fn value(&self) -> Result<f64, ObjectError> {
        self.value
            .ok_or_else(|| ObjectError::InvalidNumber(String::from_utf8_lossy(&self.raw).into()))
    }
}

impl Object for Float {
    fn object_type(&self) -> ObjectType {
        ObjectType::Float
    }

    fn raw_payload(&self) -> Bytes {
        self.raw.clone()
    }

    fn encoded_len(&self) -> usize {
        1 + self.raw.len() + 2
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        encode_line(buf, FLOAT_PREFIX, &self.raw);
    }
}
