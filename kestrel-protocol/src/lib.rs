//! Kafka wire protocol pieces needed for the connection handshake:
//! framing, request header decoding, the supported-API registry and the
//! ApiVersions response.

pub mod api_keys;
pub mod codec;
pub mod error;
pub mod frame;
pub mod header;
pub mod primitives;
pub mod registry;
pub mod response;

pub use api_keys::*;
pub use codec::*;
pub use error::{ProtocolError, Result};
pub use frame::{encode_frame, read_frame, write_frame, DEFAULT_MAX_FRAME_BYTES};
pub use header::{decode_header, RequestHeader};
pub use registry::{ApiDescriptor, ApiRegistry, VersionSupport};
pub use response::{build_response, ApiVersionsResponse};
