//! The NASP object model.
//!
//! NASP defines the following object types:
//! - Simple String: `+OK\r\n`
//! - Simple Error: `-ERR message\r\n`
//! - Integer: `:1000\r\n`
//! - Float: `;3.14\r\n`
//! - Bulk String: `$6\r\nfoobar\r\n`
//! - Bulk Error: `!<len>\r\n<error>\r\n`
//! - Tagged String: `=<len>\r\ntxt:<data>\r\n`
//! - Array: `*2\r\n<elem><elem>`
//! - Command: an array whose first element names the command
//!
//! Every object owns its raw payload and validates its size ceiling when it
//! is constructed, so an object that exists is always encodable.

use std::borrow::Cow;
use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::aggregate::{Array, BulkError, BulkString, Command, TaggedString};
use crate::constants::{
    ARRAY_PREFIX, BULK_ERROR_PREFIX, BULK_STRING_PREFIX, FLOAT_PREFIX, INTEGER_PREFIX,
    SIMPLE_ERROR_PREFIX, SIMPLE_STRING_PREFIX, TAGGED_STRING_PREFIX,
};
use crate::error::ObjectError;
use crate::simple::{Float, Integer, SimpleError, SimpleString};

/// Discriminant of an object's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    SimpleString,
    SimpleError,
    Integer,
    Float,
    BulkString,
    BulkError,
    TaggedString,
    Array,
    Command,
}

impl ObjectType {
    /// Leading byte of this type's frame. Commands are framed as arrays.
    pub const fn prefix(self) -> u8 {
        match self {
            ObjectType::SimpleString => SIMPLE_STRING_PREFIX,
            ObjectType::SimpleError => SIMPLE_ERROR_PREFIX,
            ObjectType::Integer => INTEGER_PREFIX,
            ObjectType::Float => FLOAT_PREFIX,
            ObjectType::BulkString => BULK_STRING_PREFIX,
            ObjectType::BulkError => BULK_ERROR_PREFIX,
            ObjectType::TaggedString => TAGGED_STRING_PREFIX,
            ObjectType::Array | ObjectType::Command => ARRAY_PREFIX,
        }
    }

    /// Resolve a leading byte. Never yields `Command`, which shares the array prefix.
    pub const fn from_prefix(prefix: u8) -> Option<Self> {
        match prefix {
            SIMPLE_STRING_PREFIX => Some(ObjectType::SimpleString),
            SIMPLE_ERROR_PREFIX => Some(ObjectType::SimpleError),
            INTEGER_PREFIX => Some(ObjectType::Integer),
            FLOAT_PREFIX => Some(ObjectType::Float),
            BULK_STRING_PREFIX => Some(ObjectType::BulkString),
            BULK_ERROR_PREFIX => Some(ObjectType::BulkError),
            TAGGED_STRING_PREFIX => Some(ObjectType::TaggedString),
            ARRAY_PREFIX => Some(ObjectType::Array),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ObjectType::SimpleString => "simple string",
            ObjectType::SimpleError => "simple error",
            ObjectType::Integer => "integer",
            ObjectType::Float => "float",
            ObjectType::BulkString => "bulk string",
            ObjectType::BulkError => "bulk error",
            ObjectType::TaggedString => "tagged string",
            ObjectType::Array => "array",
            ObjectType::Command => "command",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capabilities shared by every object type.
pub trait Object {
    /// The type discriminant.
    fn object_type(&self) -> ObjectType;

    /// Bytes carried inside the frame, excluding prefix, length header, and terminator.
    ///
    /// For arrays and commands this is the concatenated frames of the elements.
    fn raw_payload(&self) -> Bytes;

    /// Byte length of [`Object::wire_form`].
    fn encoded_len(&self) -> usize;

    /// Append the complete frame to `buf`.
    fn encode_into(&self, buf: &mut BytesMut);

    /// The complete frame, prefix through terminator.
    fn wire_form(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }
}

/// The decoded, logical value of an object.
#[derive(Debug, Clone, PartialEq)]
pub enum Data<'a> {
    /// Strings, errors, and tagged string values.
    Text(Cow<'a, str>),
    Integer(i64),
    Float(f64),
    /// Array elements, or command arguments.
    Elements(&'a [Value]),
}

/// A NASP object of any type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    SimpleString(SimpleString),
    SimpleError(SimpleError),
    Integer(Integer),
    Float(Float),
    BulkString(BulkString),
    BulkError(BulkError),
    TaggedString(TaggedString),
    Array(Array),
    Command(Command),
}

macro_rules! dispatch {
    ($value:expr, $obj:ident => $body:expr) => {
        match $value {
            Value::SimpleString($obj) => $body,
            Value::SimpleError($obj) => $body,
            Value::Integer($obj) => $body,
            Value::Float($obj) => $body,
            Value::BulkString($obj) => $body,
            Value::BulkError($obj) => $body,
            Value::TaggedString($obj) => $body,
            Value::Array($obj) => $body,
            Value::Command($obj) => $body,
        }
    };
}

impl Value {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a simple string value.
    #[inline]
    pub fn simple_string(text: &str) -> Result<Self, ObjectError> {
        SimpleString::new(text).map(Value::SimpleString)
    }

    /// Create a simple error value.
    #[inline]
    pub fn simple_error(text: &str) -> Result<Self, ObjectError> {
        SimpleError::new(text).map(Value::SimpleError)
    }

    /// Create an integer value.
    #[inline]
    pub fn integer(n: i64) -> Result<Self, ObjectError> {
        Integer::new(n).map(Value::Integer)
    }

    /// Create a float value.
    #[inline]
    pub fn float(n: f64) -> Result<Self, ObjectError> {
        Float::new(n).map(Value::Float)
    }

    /// Create a bulk string value.
    #[inline]
    pub fn bulk_string(data: &[u8]) -> Result<Self, ObjectError> {
        BulkString::new(data).map(Value::BulkString)
    }

    /// Create a bulk error value.
    #[inline]
    pub fn bulk_error(data: &[u8]) -> Result<Self, ObjectError> {
        BulkError::new(data).map(Value::BulkError)
    }

    /// Create a tagged string value.
    #[inline]
    pub fn tagged_string(encoding: &str, data: &[u8]) -> Result<Self, ObjectError> {
        TaggedString::new(encoding, data).map(Value::TaggedString)
    }

    /// Create an array value.
    #[inline]
    pub fn array(elements: Vec<Value>) -> Result<Self, ObjectError> {
        Array::new(elements).map(Value::Array)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The decoded logical value.
    ///
    /// Fails only for numeric objects whose text is not a number.
    pub fn data(&self) -> Result<Data<'_>, ObjectError> {
        Ok(match self {
            Value::SimpleString(s) => Data::Text(s.value()),
            Value::SimpleError(e) => Data::Text(e.value()),
            Value::Integer(i) => Data::Integer(i.value()?),
            Value::Float(f) => Data::Float(f.value()?),
            Value::BulkString(s) => Data::Text(s.value()),
            Value::BulkError(e) => Data::Text(e.value()),
            Value::TaggedString(t) => Data::Text(t.value()),
            Value::Array(a) => Data::Elements(a.elements()),
            Value::Command(c) => Data::Elements(c.args()),
        })
    }

    /// Leading byte of this value's frame.
    #[inline]
    pub fn prefix(&self) -> u8 {
        self.object_type().prefix()
    }

    /// Returns true for simple and bulk errors.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::SimpleError(_) | Value::BulkError(_))
    }

    /// Returns the text of any string-like value.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::SimpleString(s) => Some(s.value()),
            Value::SimpleError(e) => Some(e.value()),
            Value::BulkString(s) => Some(s.value()),
            Value::BulkError(e) => Some(e.value()),
            Value::TaggedString(t) => Some(t.value()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bulk_string(&self) -> Option<&BulkString> {
        match self {
            Value::BulkString(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Value::Command(c) => Some(c),
            _ => None,
        }
    }
}

impl Object for Value {
    fn object_type(&self) -> ObjectType {
        dispatch!(self, o => o.object_type())
    }

    fn raw_payload(&self) -> Bytes {
        dispatch!(self, o => o.raw_payload())
    }

    fn encoded_len(&self) -> usize {
        dispatch!(self, o => o.encoded_len())
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        dispatch!(self, o => o.encode_into(buf))
    }
}

macro_rules! impl_from_object {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Value {
                #[inline]
                fn from(object: $variant) -> Self {
                    Value::$variant(object)
                }
            }
        )*
    };
}

impl_from_object!(
    SimpleString,
    SimpleError,
    Integer,
    Float,
    BulkString,
    BulkError,
    TaggedString,
    Array,
    Command,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CommandName;

    #[test]
    fn test_prefix_roundtrip() {
        for ty in [
            ObjectType::SimpleString,
            ObjectType::SimpleError,
            ObjectType::Integer,
            ObjectType::Float,
            ObjectType::BulkString,
            ObjectType::BulkError,
            ObjectType::TaggedString,
            ObjectType::Array,
        ] {
            assert_eq!(ObjectType::from_prefix(ty.prefix()), Some(ty));
        }
        assert_eq!(ObjectType::Command.prefix(), b'*');
        assert_eq!(ObjectType::from_prefix(b'?'), None);
    }

    #[test]
    fn test_object_type() {
        assert_eq!(
            Value::simple_string("OK").unwrap().object_type(),
            ObjectType::SimpleString
        );
        assert_eq!(
            Value::float(1.5).unwrap().object_type(),
            ObjectType::Float
        );
        let cmd = Command::new(CommandName::Ping, vec![]).unwrap();
        assert_eq!(Value::from(cmd).object_type(), ObjectType::Command);
    }

    #[test]
    fn test_data() {
        assert_eq!(
            Value::bulk_string(b"apple").unwrap().data(),
            Ok(Data::Text("apple".into()))
        );
        assert_eq!(Value::integer(7).unwrap().data(), Ok(Data::Integer(7)));
        assert_eq!(Value::float(2.5).unwrap().data(), Ok(Data::Float(2.5)));

        let inner = vec![Value::integer(1).unwrap()];
        let arr = Value::array(inner.clone()).unwrap();
        assert_eq!(arr.data(), Ok(Data::Elements(&inner)));
    }

    #[test]
    fn test_value_wire_form() {
        let v = Value::tagged_string("hex", b"ffffff").unwrap();
        assert_eq!(v.wire_form(), Bytes::from_static(b"=10\r\nhex:ffffff\r\n"));
        assert_eq!(v.encoded_len(), v.wire_form().len());
        assert_eq!(v.raw_payload(), Bytes::from_static(b"ffffff"));
    }

    #[test]
    fn test_accessors() {
        let v = Value::bulk_error(b"ERR boom").unwrap();
        assert!(v.is_error());
        assert_eq!(v.as_text().as_deref(), Some("ERR boom"));
        assert!(v.as_bulk_string().is_none());
        assert!(v.as_array().is_none());
        assert_eq!(v.prefix(), b'!');

        let v = Value::integer(3).unwrap();
        assert!(!v.is_error());
        assert!(v.as_text().is_none());
    }
}
