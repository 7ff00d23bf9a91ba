//! Wire-format constants: type prefixes, framing bytes, and size ceilings.

/// Line and payload terminator.
pub const CRLF: &[u8; 2] = b"\r\n";

/// Maximum payload of a simple string or simple error (512 bytes).
pub const SIMPLE_SIZE_MAX: usize = 512;

/// Maximum payload of a bulk string or bulk error (2MB).
pub const BULK_SIZE_MAX: usize = 2 * 1024 * 1024;

/// Maximum declared length of a tagged string, covering the encoding tag,
/// the separator, and the value (128KB).
pub const TAGGED_STRING_SIZE_MAX: usize = 128 * 1024;

/// Maximum encoded size of an array or command frame (64MB).
pub const ARRAY_SIZE_MAX: usize = 64 * 1024 * 1024;

/// Maximum number of elements in an array or command.
pub const ARRAY_LENGTH_MAX: usize = 512;

/// Maximum size of a complete request or response (64MB).
pub const MESSAGE_SIZE_MAX: usize = 64 * 1024 * 1024;

/// Largest integer magnitude an integer object may carry (2^53 - 1).
pub const INTEGER_MAGNITUDE_MAX: i64 = (1 << 53) - 1;

pub const SIMPLE_STRING_PREFIX: u8 = b'+';
pub const SIMPLE_ERROR_PREFIX: u8 = b'-';
pub const INTEGER_PREFIX: u8 = b':';
pub const FLOAT_PREFIX: u8 = b';';
pub const BULK_STRING_PREFIX: u8 = b'$';
pub const BULK_ERROR_PREFIX: u8 = b'!';
pub const TAGGED_STRING_PREFIX: u8 = b'=';
pub const ARRAY_PREFIX: u8 = b'*';

/// Separates a tagged string's encoding tag from its value.
pub const TAGGED_STRING_SEPARATOR: u8 = b':';

/// Length of a tagged string's encoding tag.
pub const TAGGED_STRING_ENCODING_LEN: usize = 3;

/// Envelope token for requests.
pub const REQUEST_TOKEN: &str = "REQ";

/// Envelope token for responses.
pub const RESPONSE_TOKEN: &str = "RES";

/// Payload keyword announcing a command body.
pub const COMMAND_KEYWORD: &str = "COMMAND";

/// Payload keyword announcing a value body.
pub const VALUE_KEYWORD: &str = "VALUE";

/// Number of decimal digits needed to write `n`.
#[inline]
pub(crate) fn digits(n: usize) -> usize {
    let mut buf = itoa::Buffer::new();
    buf.format(n).len()
}
