//! Error types for the kestrel server

use std::io;

use kestrel_protocol::ProtocolError;
use thiserror::Error;

/// Main error type for the kestrel server
#[derive(Error, Debug)]
pub enum ServerError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Framing or header error; fatal to the connection it happened on
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ServerError> for io::Error {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Io(e) => e,
            ServerError::Protocol(ProtocolError::Io(e)) => e,
            _ => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}
