//! Kafka request header (v1): api_key, api_version, correlation_id, client_id.

use bytes::{Buf, BufMut};

use crate::api_keys::ApiKey;
use crate::codec::{Decodable, Encodable};
use crate::error::{ProtocolError, Result};
use crate::primitives::NullableString;

/// Bytes before the client-id length field: api_key, api_version, correlation_id.
const FIXED_FIELDS_LEN: usize = 8;

/// A Kafka protocol request header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RequestHeader {
    /// The API key of this request, kept raw so unknown keys still decode
    pub api_key: i16,
    /// The API version of this request
    pub api_version: i16,
    /// The correlation ID of this request
    pub correlation_id: i32,
    /// The client ID string, `None` when sent as null
    pub client_id: Option<String>,
}

impl RequestHeader {
    pub fn new(api_key: impl Into<i16>, api_version: i16, correlation_id: i32) -> Self {
        Self {
            api_key: api_key.into(),
            api_version,
            correlation_id,
            client_id: None,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// The named key, if the broker knows it.
    pub fn known_api_key(&self) -> Option<ApiKey> {
        ApiKey::from_i16(self.api_key)
    }
}

impl Encodable for RequestHeader {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.api_key.encode(buf)?;
        self.api_version.encode(buf)?;
        self.correlation_id.encode(buf)?;
        NullableString(self.client_id.clone()).encode(buf)
    }
}

impl Decodable for RequestHeader {
    /// Decodes the header from a frame payload. Bytes after the client id
    /// (request body, tagged fields) are left in `buf` untouched.
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < FIXED_FIELDS_LEN + 2 {
            return Err(ProtocolError::MalformedHeader(format!(
                "need at least {} bytes, got {}",
                FIXED_FIELDS_LEN + 2,
                buf.remaining()
            )));
        }
        let api_key = buf.get_i16();
        let api_version = buf.get_i16();
        let correlation_id = buf.get_i32();
        let client_id = NullableString::decode(buf)?.into_inner();

        Ok(Self {
            api_key,
            api_version,
            correlation_id,
            client_id,
        })
    }
}

/// Decode the header at the start of a frame payload.
pub fn decode_header(payload: &[u8]) -> Result<RequestHeader> {
    let mut buf = payload;
    RequestHeader::decode(&mut buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encoded(header: &RequestHeader) -> BytesMut {
        let mut buf = BytesMut::new();
        header.encode(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_decode_fixed_layout() {
        let payload = [
            0x00, 0x12, // api_key 18
            0x00, 0x04, // api_version 4
            0x7f, 0xff, 0xff, 0xff, // correlation_id
            0x00, 0x03, b'c', b'l', b'i',
        ];
        let header = decode_header(&payload).unwrap();
        assert_eq!(header.api_key, 18);
        assert_eq!(header.api_version, 4);
        assert_eq!(header.correlation_id, i32::MAX);
        assert_eq!(header.client_id.as_deref(), Some("cli"));
        assert_eq!(header.known_api_key(), Some(ApiKey::ApiVersions));
    }

    #[test]
    fn test_null_client_id() {
        let header = RequestHeader::new(ApiKey::ApiVersions, 3, 7);
        let buf = encoded(&header);
        assert_eq!(&buf[8..], &[0xff, 0xff]);
        assert_eq!(decode_header(&buf).unwrap(), header);
    }

    #[test]
    fn test_empty_client_id() {
        let header = RequestHeader::new(ApiKey::ApiVersions, 0, 1).with_client_id("");
        let decoded = decode_header(&encoded(&header)).unwrap();
        assert_eq!(decoded.client_id, Some(String::new()));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let header = RequestHeader::new(75i16, 0, -42).with_client_id("kafka-cli");
        let mut buf = encoded(&header);
        buf.extend_from_slice(&[0x00, 0x01, 0x02]);

        let mut rd = buf.freeze();
        let decoded = RequestHeader::decode(&mut rd).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(rd.as_ref(), &[0x00, 0x01, 0x02]);
    }

    #[test]
    fn test_eight_byte_payload_is_malformed() {
        let payload = [0x00, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x07];
        let err = decode_header(&payload).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedHeader(_)));
    }

    #[test]
    fn test_client_id_longer_than_payload() {
        let payload = [0x00, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x07, 0x00, 0x09, b'x'];
        assert!(matches!(
            decode_header(&payload),
            Err(ProtocolError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_client_id_invalid_utf8() {
        let payload = [0x00, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x07, 0x00, 0x01, 0xff];
        assert!(matches!(
            decode_header(&payload),
            Err(ProtocolError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        assert!(decode_header(&[]).is_err());
    }
}
