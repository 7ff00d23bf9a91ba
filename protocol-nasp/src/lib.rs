//! Navi Serialisation Protocol (NASP) codec.
//!
//! NASP is a CRLF-delimited, length-prefixed wire format. This crate provides
//! the typed object model, a decoder over fully buffered input, the matching
//! encoder, and the request/response message envelope.
//!
//! - **Values**: build, decode, and encode NASP objects (strings, errors,
//!   numbers, tagged strings, arrays, commands)
//! - **Messages**: `REQ`/`RES` envelopes carrying a command, a value, or
//!   custom text
//!
//! Every object validates its size ceiling when it is built, so a value that
//! exists can always be encoded.
//!
//! # Example - Client Side
//!
//! ```
//! use protocol_nasp::{Command, CommandName, Message, MessageKind, decode_message};
//!
//! // Encode a PING request
//! let ping = Command::new(CommandName::Ping, vec![]).unwrap();
//! let wire = Message::with_command(MessageKind::Request, 1, ping).wire_form();
//! assert_eq!(&wire[..], b"REQ\r\n1\r\nCOMMAND\r\n*1\r\n$4\r\nPING\r\n");
//!
//! // Parse the response
//! let response = decode_message(b"RES\r\n1\r\nVALUE\r\n+PONG\r\n").unwrap();
//! assert_eq!(response.id(), 1);
//! ```
//!
//! # Example - Server Side
//!
//! ```
//! use protocol_nasp::{Body, Message, MessageKind, Value, decode_message};
//!
//! // Parse an incoming request
//! let request = decode_message(b"REQ\r\n7\r\nCOMMAND\r\n*1\r\n$4\r\nping\r\n").unwrap();
//! assert!(matches!(request.body(), Some(Body::Command(_))));
//!
//! // Encode a response
//! let pong = Value::simple_string("PONG").unwrap();
//! let wire = Message::with_value(MessageKind::Response, request.id(), pong).wire_form();
//! assert_eq!(&wire[..], b"RES\r\n7\r\nVALUE\r\n+PONG\r\n");
//! ```

mod aggregate;
pub mod constants;
mod decode;
pub mod encode;
mod error;
mod message;
mod simple;
mod value;

pub use aggregate::{Array, BulkError, BulkString, Command, CommandName, TaggedString};
pub use decode::{DEFAULT_MAX_DEPTH, DecodeOptions, Decoder, decode_message, decode_value};
pub use error::{DecodeError, ObjectError};
pub use message::{Body, Message, MessageKind, Payload, PayloadKind};
pub use simple::{Float, Integer, SimpleError, SimpleString};
pub use value::{Data, Object, ObjectType, Value};
