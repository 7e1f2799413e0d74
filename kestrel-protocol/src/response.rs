//! ApiVersions-style handshake response: building and serialization.

use bytes::{Buf, BufMut};
use kestrel_common::ErrorCode;
use tracing::{debug, warn};

use crate::codec::{Decodable, Encodable};
use crate::error::{ProtocolError, Result};
use crate::header::RequestHeader;
use crate::primitives::TaggedFields;
use crate::registry::{ApiDescriptor, ApiRegistry, VersionSupport};

/// The handshake response, including its correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiVersionsResponse {
    /// Echoed from the request header.
    pub correlation_id: i32,
    /// The error code, or `None` if the requested version is supported.
    pub error_code: ErrorCode,
    /// Every API the broker supports, in registry order.
    pub apis: Vec<ApiDescriptor>,
    /// Always zero; no quotas are enforced.
    pub throttle_time_ms: i32,
}

/// Build the response for `header`.
///
/// The catalogue is advertised in full whatever was asked for. An unknown API
/// key is answered with `UnsupportedVersion`, same as an out-of-range version.
pub fn build_response(header: &RequestHeader, registry: &ApiRegistry) -> ApiVersionsResponse {
    let error_code = match registry.negotiate(header.api_key, header.api_version) {
        VersionSupport::Supported(_) => ErrorCode::None,
        VersionSupport::UnsupportedVersion(api) => {
            debug!(
                api_key = header.api_key,
                api_version = header.api_version,
                min_version = api.min_version,
                max_version = api.max_version,
                "unsupported api version"
            );
            ErrorCode::UnsupportedVersion
        }
        VersionSupport::UnknownApiKey(api_key) => {
            warn!(api_key, "request for unknown api key");
            ErrorCode::UnsupportedVersion
        }
    };

    ApiVersionsResponse {
        correlation_id: header.correlation_id,
        error_code,
        apis: registry.list_all().to_vec(),
        throttle_time_ms: 0,
    }
}

impl Encodable for ApiVersionsResponse {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        let num_apis = i8::try_from(self.apis.len())
            .map_err(|_| ProtocolError::TooManyApis(self.apis.len()))?;

        self.correlation_id.encode(buf)?;
        self.error_code.to_i16().encode(buf)?;
        num_apis.encode(buf)?;
        for api in &self.apis {
            api.encode(buf)?;
        }
        self.throttle_time_ms.encode(buf)?;
        TaggedFields.encode(buf)
    }
}

impl Decodable for ApiVersionsResponse {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let correlation_id = i32::decode(buf)?;
        let raw_error_code = i16::decode(buf)?;
        let error_code = ErrorCode::from_i16(raw_error_code).ok_or_else(|| {
            ProtocolError::MalformedResponse(format!("unknown error code {}", raw_error_code))
        })?;

        let num_apis = i8::decode(buf)?;
        if num_apis < 0 {
            return Err(ProtocolError::MalformedResponse(format!(
                "negative api count {}",
                num_apis
            )));
        }
        let mut apis = Vec::with_capacity(num_apis as usize);
        for _ in 0..num_apis {
            apis.push(ApiDescriptor::decode(buf)?);
        }

        let throttle_time_ms = i32::decode(buf)?;
        TaggedFields::decode(buf)?;

        Ok(Self {
            correlation_id,
            error_code,
            apis,
            throttle_time_ms,
        })
    }
}
