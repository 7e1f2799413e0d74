//! Error types for the Kafka wire codec

use std::io;

use thiserror::Error;

/// A specialized `Result` type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while framing, decoding or encoding protocol messages
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// I/O error on the underlying transport
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the stream part way through a frame
    #[error("Incomplete frame: expected {expected} bytes, received {received}")]
    IncompleteFrame { expected: usize, received: usize },

    /// The length prefix was negative
    #[error("Invalid frame length: {0}")]
    InvalidFrameLength(i32),

    /// The length prefix exceeded the configured limit
    #[error("Frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The request header could not be decoded
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// A response body could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The API catalogue does not fit in the one-byte count field
    #[error("Too many APIs to encode: {0}")]
    TooManyApis(usize),
}
