//! Encoding of NASP values and messages.
//!
//! Each function accepts either a primitive or an already-built object. An
//! object is returned as its existing wire form; a primitive is validated
//! exactly as the matching constructor would and then framed.
//!
//! ```
//! use protocol_nasp::encode;
//! use protocol_nasp::SimpleString;
//!
//! assert_eq!(&encode::simple_string("OK").unwrap()[..], b"+OK\r\n");
//!
//! let built = SimpleString::new("OK").unwrap();
//! assert_eq!(&encode::simple_string(&built).unwrap()[..], b"+OK\r\n");
//! ```

use bytes::Bytes;

use crate::aggregate::{Array, BulkError, BulkString, Command, CommandName, TaggedString};
use crate::error::ObjectError;
use crate::message::{Body, Message, MessageKind, Payload};
use crate::simple::{Float, Integer, SimpleError, SimpleString};
use crate::value::{Object, Value};

/// Encoder argument: a primitive to build from, or a built object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input<'a, P, O> {
    Primitive(P),
    Object(&'a O),
}

/// Numeric primitive: a number, or text to be kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric<'a, N> {
    Number(N),
    Text(&'a str),
}

macro_rules! impl_input {
    ($lt:lifetime, $prim:ty => $obj:ty) => {
        impl<$lt> From<$prim> for Input<$lt, $prim, $obj> {
            #[inline]
            fn from(primitive: $prim) -> Self {
                Input::Primitive(primitive)
            }
        }

        impl<$lt> From<&$lt $obj> for Input<$lt, $prim, $obj> {
            #[inline]
            fn from(object: &$lt $obj) -> Self {
                Input::Object(object)
            }
        }
    };
}

impl_input!('a, &'a str => SimpleString);
impl_input!('a, &'a str => SimpleError);
impl_input!('a, Numeric<'a, i64> => Integer);
impl_input!('a, Numeric<'a, f64> => Float);
impl_input!('a, &'a [u8] => BulkString);
impl_input!('a, &'a [u8] => BulkError);
impl_input!('a, (&'a str, &'a [u8]) => TaggedString);
impl_input!('a, Vec<Value> => Array);
impl_input!('a, (CommandName, Vec<Value>) => Command);

macro_rules! impl_numeric_input {
    ($num:ty => $obj:ty) => {
        impl<'a> From<$num> for Input<'a, Numeric<'a, $num>, $obj> {
            #[inline]
            fn from(n: $num) -> Self {
                Input::Primitive(Numeric::Number(n))
            }
        }

        impl<'a> From<&'a str> for Input<'a, Numeric<'a, $num>, $obj> {
            #[inline]
            fn from(text: &'a str) -> Self {
                Input::Primitive(Numeric::Text(text))
            }
        }
    };
}

impl_numeric_input!(i64 => Integer);
impl_numeric_input!(f64 => Float);

/// Build from a primitive, or reuse the object, and return the wire form.
#[inline]
fn encode<P, O: Object>(
    input: Input<'_, P, O>,
    build: impl FnOnce(P) -> Result<O, ObjectError>,
) -> Result<Bytes, ObjectError> {
    match input {
        Input::Primitive(primitive) => Ok(build(primitive)?.wire_form()),
        Input::Object(object) => Ok(object.wire_form()),
    }
}

// ============================================================================
// Simple values
// ============================================================================

pub fn simple_string<'a>(
    input: impl Into<Input<'a, &'a str, SimpleString>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), SimpleString::new)
}

pub fn simple_error<'a>(
    input: impl Into<Input<'a, &'a str, SimpleError>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), SimpleError::new)
}

/// Encode an integer from an `i64`, from text kept verbatim, or from an
/// [`Integer`].
pub fn integer<'a>(
    input: impl Into<Input<'a, Numeric<'a, i64>, Integer>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), |n| match n {
        Numeric::Number(n) => Integer::new(n),
        Numeric::Text(text) => Integer::from_text(text),
    })
}

/// Encode a float from an `f64`, from text kept verbatim, or from a
/// [`Float`].
pub fn float<'a>(
    input: impl Into<Input<'a, Numeric<'a, f64>, Float>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), |n| match n {
        Numeric::Number(n) => Float::new(n),
        Numeric::Text(text) => Float::from_text(text),
    })
}

// ============================================================================
// Length-prefixed and aggregate values
// ============================================================================

pub fn bulk_string<'a>(
    input: impl Into<Input<'a, &'a [u8], BulkString>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), BulkString::new)
}

pub fn bulk_error<'a>(
    input: impl Into<Input<'a, &'a [u8], BulkError>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), BulkError::new)
}

/// Encode a tagged string from an `(encoding, value)` pair or a
/// [`TaggedString`].
pub fn tagged_string<'a>(
    input: impl Into<Input<'a, (&'a str, &'a [u8]), TaggedString>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), |(encoding, data)| {
        TaggedString::new(encoding, data)
    })
}

pub fn array<'a>(input: impl Into<Input<'a, Vec<Value>, Array>>) -> Result<Bytes, ObjectError> {
    encode(input.into(), Array::new)
}

/// Encode a command from a `(name, args)` pair or a [`Command`].
pub fn command<'a>(
    input: impl Into<Input<'a, (CommandName, Vec<Value>), Command>>,
) -> Result<Bytes, ObjectError> {
    encode(input.into(), |(name, args)| Command::new(name, args))
}

/// Wire form of any value.
#[inline]
pub fn value(value: &Value) -> Bytes {
    value.wire_form()
}

// ============================================================================
// Messages
// ============================================================================

/// Wire form of a message: the envelope header followed by the body frame,
/// if any.
#[inline]
pub fn message(message: &Message) -> Bytes {
    message.wire_form()
}

/// Encode a request, checking that `body` agrees with `payload`.
pub fn request(id: u64, payload: Payload, body: Option<Body>) -> Result<Bytes, ObjectError> {
    Ok(Message::new(MessageKind::Request, id, payload, body)?.wire_form())
}

/// Encode a response, checking that `body` agrees with `payload`.
pub fn response(id: u64, payload: Payload, body: Option<Body>) -> Result<Bytes, ObjectError> {
    Ok(Message::new(MessageKind::Response, id, payload, body)?.wire_form())
}
