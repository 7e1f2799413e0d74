//! Common types and utilities for the Kestrel handshake broker

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error_code;
pub mod logging;

/// Re-export commonly used items
pub use error_code::ErrorCode;
