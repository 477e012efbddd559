//! Error types for PathMap operations.

use std::fmt;

/// Error type for PathMap operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // Path errors
    /// A path argument does not start with `/`.
    PathShape,

    // Line grammar errors
    /// A node line failed to decode: unknown starter byte, a segment
    /// without a value marker, a stray value marker, or an unterminated
    /// escape. `pos` is the byte position within the line.
    MalformedLine { pos: usize, reason: &'static str },

    // Reader errors
    /// Scanned past the end of the buffer looking for a line terminator,
    /// or the buffer contained no full line.
    UnexpectedEof { offset: usize },
    /// The root offset resolved to a JSON payload instead of a node line.
    UnexpectedPayload { offset: u64 },

    // Bloom filter errors
    /// A Bloom filter parameter is outside its valid domain.
    BloomConfig {
        param: &'static str,
        reason: &'static str,
    },

    // JSON errors
    /// Failed to parse a leaf line as JSON.
    JsonParse(String),
    /// Failed to serialize a payload to JSON.
    JsonSerialize(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PathShape => write!(f, "path must start with '/'"),
            Error::MalformedLine { pos, reason } => {
                write!(f, "malformed node line at byte {pos}: {reason}")
            }
            Error::UnexpectedEof { offset } => {
                write!(f, "unexpected end of buffer at offset {offset}")
            }
            Error::UnexpectedPayload { offset } => {
                write!(f, "expected a node line at offset {offset:#x}, found a JSON payload")
            }
            Error::BloomConfig { param, reason } => {
                write!(f, "invalid bloom parameter {param}: {reason}")
            }
            Error::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
            Error::JsonSerialize(msg) => write!(f, "JSON serialize error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for PathMap operations.
pub type Result<T> = std::result::Result<T, Error>;
