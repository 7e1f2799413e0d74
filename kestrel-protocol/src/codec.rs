//! Traits for encoding and decoding Kafka protocol messages

use bytes::{Buf, BufMut};

use crate::error::Result;

/// A type that can be encoded into a buffer.
///
/// Implementors write their big-endian wire representation into the provided buffer.
pub trait Encodable {
    /// Encode a value into a buffer.
    fn encode(&self, buf: &mut impl BufMut) -> Result<()>;
}

/// A type that can be decoded from a buffer.
///
/// Implementors must check `buf.remaining()` before reading so that short input
/// surfaces as an error rather than a panic inside `bytes`.
pub trait Decodable: Sized {
    /// Decode a value from a buffer.
    fn decode(buf: &mut impl Buf) -> Result<Self>;
}
