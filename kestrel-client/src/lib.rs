//! Handshake client for the kestrel broker

use anyhow::{bail, Result};
use bytes::BytesMut;
use kestrel_protocol::{
    api_keys::ApiKey,
    codec::{Decodable, Encodable},
    encode_frame, read_frame, ApiVersionsResponse, RequestHeader, DEFAULT_MAX_FRAME_BYTES,
};
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

pub const DEFAULT_CLIENT_ID: &str = "kestrel-client";

#[derive(Debug)]
pub struct Client {
    stream: TcpStream,
    correlation_id: i32,
    client_id: Option<String>,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        info!("Connected to server at {}", addr);
        Ok(Self {
            stream,
            correlation_id: 0,
            client_id: Some(DEFAULT_CLIENT_ID.to_string()),
        })
    }

    /// Send `None` to omit the client id from request headers.
    pub fn set_client_id(&mut self, client_id: Option<String>) {
        self.client_id = client_id;
    }

    pub async fn api_versions(&mut self, api_version: i16) -> Result<ApiVersionsResponse> {
        info!("Sending ApiVersions v{} request...", api_version);
        self.send_request(ApiKey::ApiVersions.to_i16(), api_version)
            .await
    }

    /// Send a bare header for `api_key`. The broker answers every request with
    /// the ApiVersions catalogue.
    pub async fn send_request(
        &mut self,
        api_key: i16,
        api_version: i16,
    ) -> Result<ApiVersionsResponse> {
        let correlation_id = self.correlation_id;
        self.correlation_id = self.correlation_id.wrapping_add(1);

        let header = RequestHeader {
            api_key,
            api_version,
            correlation_id,
            client_id: self.client_id.clone(),
        };

        let mut buf = BytesMut::new();
        header.encode(&mut buf)?;
        self.stream.write_all(&encode_frame(&buf)?).await?;

        let Some(mut response_buf) = read_frame(&mut self.stream, DEFAULT_MAX_FRAME_BYTES).await?
        else {
            bail!("server closed the connection");
        };
        let response = ApiVersionsResponse::decode(&mut response_buf)?;
        if response.correlation_id != correlation_id {
            bail!(
                "correlation id mismatch: sent {}, received {}",
                correlation_id,
                response.correlation_id
            );
        }

        debug!("Received response: {:?}", response);
        Ok(response)
    }
}
