//! Per-connection request loop: read frame, decode header, build response, write frame.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use kestrel_protocol::codec::Encodable;
use kestrel_protocol::{build_response, decode_header, read_frame, write_frame, ApiRegistry};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info};

use crate::error::ServerError;

/// Serve one request/response exchange.
///
/// Returns `Ok(false)` when the peer closed cleanly between frames. Any error
/// leaves the stream at an unknown frame boundary and nothing is written for
/// the offending frame.
pub async fn serve_request<S>(
    stream: &mut S,
    registry: &ApiRegistry,
    max_frame_bytes: usize,
) -> Result<bool, ServerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let Some(payload) = read_frame(stream, max_frame_bytes).await? else {
        return Ok(false);
    };
    debug!(len = payload.len(), "received frame");

    let header = decode_header(&payload)?;
    info!(
        api_key = header.api_key,
        api_version = header.api_version,
        correlation_id = header.correlation_id,
        client_id = header.client_id.as_deref().unwrap_or("-"),
        "received request"
    );

    let response = build_response(&header, registry);
    let mut body = BytesMut::new();
    response.encode(&mut body)?;
    write_frame(stream, &body).await?;
    debug!(
        correlation_id = response.correlation_id,
        error_code = response.error_code.to_i16(),
        len = body.len(),
        "sent response"
    );

    Ok(true)
}

/// Run the request loop until the peer disconnects or a request is unrecoverable.
pub async fn handle_connection<S>(
    mut stream: S,
    addr: SocketAddr,
    registry: Arc<ApiRegistry>,
    max_frame_bytes: usize,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        match serve_request(&mut stream, &registry, max_frame_bytes).await {
            Ok(true) => {
                // Keep connection open
            }
            Ok(false) => {
                info!("Closing connection with {}", addr);
                break;
            }
            Err(e) => {
                error!("Error processing request from {}: {}", addr, e);
                break;
            }
        }
    }
}
