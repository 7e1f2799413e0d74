use std::net::SocketAddr;

use kestrel_protocol::DEFAULT_MAX_FRAME_BYTES;

use crate::error::ServerError;

pub const DEFAULT_BIND: &str = "127.0.0.1:9092";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub bind: SocketAddr,
    /// Connections beyond this are accepted and immediately dropped.
    pub max_connections: usize,
    /// Largest frame payload a connection will allocate for.
    pub max_frame_bytes: usize,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.max_connections == 0 {
            return Err(ServerError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.max_frame_bytes == 0 || self.max_frame_bytes > i32::MAX as usize {
            return Err(ServerError::Config(format!(
                "max_frame_bytes must be between 1 and {}",
                i32::MAX
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 9092)),
            max_connections: 1024,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}
