//! Primitive types used in the Kafka protocol

use std::str;

use bytes::{Buf, BufMut};

use crate::codec::{Decodable, Encodable};
use crate::error::{ProtocolError, Result};

// --- Implementations for primitive integer types ---

macro_rules! impl_codec_for_int {
    ($($t:ty),*) => {
        $(
            impl Encodable for $t {
                fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
                    buf.put_slice(&self.to_be_bytes());
                    Ok(())
                }
            }

            impl Decodable for $t {
                fn decode(buf: &mut impl Buf) -> Result<Self> {
                    const SIZE: usize = std::mem::size_of::<$t>();
                    if buf.remaining() < SIZE {
                        return Err(ProtocolError::MalformedResponse(format!(
                            "need {} bytes for {}, {} remaining",
                            SIZE,
                            stringify!($t),
                            buf.remaining()
                        )));
                    }
                    let mut bytes = [0u8; SIZE];
                    buf.copy_to_slice(&mut bytes);
                    Ok(<$t>::from_be_bytes(bytes))
                }
            }
        )*
    };
}

impl_codec_for_int!(i8, i16, i32, u8);

// --- NullableString ---

/// A string prefixed by an `i16` length, where `-1` encodes null.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NullableString(pub Option<String>);

impl NullableString {
    /// Length sentinel for a null string.
    pub const NULL_LENGTH: i16 = -1;

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl Encodable for NullableString {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        match &self.0 {
            Some(s) => {
                let len = i16::try_from(s.len()).map_err(|_| {
                    ProtocolError::MalformedHeader(format!("string too long: {} bytes", s.len()))
                })?;
                len.encode(buf)?;
                buf.put_slice(s.as_bytes());
            }
            None => Self::NULL_LENGTH.encode(buf)?,
        }
        Ok(())
    }
}

impl Decodable for NullableString {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < 2 {
            return Err(ProtocolError::MalformedHeader(format!(
                "missing string length: {} bytes remaining",
                buf.remaining()
            )));
        }
        let len = buf.get_i16();
        if len == Self::NULL_LENGTH {
            return Ok(NullableString(None));
        }
        if len < 0 {
            return Err(ProtocolError::MalformedHeader(format!(
                "invalid string length {}",
                len
            )));
        }
        let len = len as usize;
        if buf.remaining() < len {
            return Err(ProtocolError::MalformedHeader(format!(
                "string length {} exceeds remaining {} bytes",
                len,
                buf.remaining()
            )));
        }
        let mut bytes = vec![0; len];
        buf.copy_to_slice(&mut bytes);
        let s = String::from_utf8(bytes)
            .map_err(|e| ProtocolError::MalformedHeader(format!("string is not UTF-8: {}", e)))?;
        Ok(NullableString(Some(s)))
    }
}

impl From<Option<String>> for NullableString {
    fn from(s: Option<String>) -> Self {
        Self(s)
    }
}

impl From<&str> for NullableString {
    fn from(s: &str) -> Self {
        Self(Some(s.to_string()))
    }
}

// --- TaggedFields ---

/// An empty tag buffer: a single zero byte meaning "no tagged fields".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TaggedFields;

impl Encodable for TaggedFields {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        buf.put_u8(0);
        Ok(())
    }
}

impl Decodable for TaggedFields {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let num_tags = u8::decode(buf)?;
        if num_tags != 0 {
            return Err(ProtocolError::MalformedResponse(format!(
                "unexpected tagged fields: {}",
                num_tags
            )));
        }
        Ok(TaggedFields)
    }
}
