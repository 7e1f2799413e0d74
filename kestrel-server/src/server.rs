//! Accept loop for the kestrel handshake broker

use std::net::SocketAddr;
use std::sync::Arc;

use kestrel_protocol::ApiRegistry;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::connection::handle_connection;
use crate::error::ServerError;

/// Main server type for the kestrel broker
#[derive(Debug)]
pub struct Server {
    /// The TCP listener
    listener: TcpListener,
    /// Limits and framing settings
    config: ServerConfig,
    /// Channel for shutdown signal
    shutdown_tx: broadcast::Sender<()>,
    /// Subscribed in `new` so a signal sent before `run` is still seen
    shutdown_rx: broadcast::Receiver<()>,
    /// Supported API catalogue, shared read-only with every connection
    registry: Arc<ApiRegistry>,
    /// One permit per open connection
    connection_permits: Arc<Semaphore>,
}

impl Server {
    /// Create a new server instance
    pub fn new(
        listener: TcpListener,
        config: ServerConfig,
        registry: Arc<ApiRegistry>,
    ) -> (Self, broadcast::Sender<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let connection_permits = Arc::new(Semaphore::new(config.max_connections));

        (
            Self {
                listener,
                config,
                shutdown_tx: shutdown_tx.clone(),
                shutdown_rx,
                registry,
                connection_permits,
            },
            shutdown_tx,
        )
    }

    /// Bind `config.bind` and create a server on it
    pub async fn bind(
        config: ServerConfig,
        registry: Arc<ApiRegistry>,
    ) -> Result<(Self, broadcast::Sender<()>), ServerError> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind).await?;
        Ok(Self::new(listener, config, registry))
    }

    /// Another handle for signalling shutdown
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Get the local address of the server
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server
    pub async fn run(mut self) -> Result<(), ServerError> {
        info!("Server listening on {}", self.local_addr()?);
        info!(
            apis = ?self.registry.list_all(),
            "Advertising {} APIs",
            self.registry.len()
        );

        let mut connection_count: u64 = 0;

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let permits = Arc::clone(&self.connection_permits);
                            let Ok(permit) = permits.try_acquire_owned() else {
                                warn!(
                                    "Max connections reached, rejecting new connection from {}",
                                    addr
                                );
                                continue;
                            };
                            connection_count += 1;
                            info!("Accepted connection #{}: {}", connection_count, addr);

                            if let Err(e) = stream.set_nodelay(true) {
                                warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
                            }

                            let registry = Arc::clone(&self.registry);
                            let max_frame_bytes = self.config.max_frame_bytes;
                            tokio::spawn(async move {
                                handle_connection(stream, addr, registry, max_frame_bytes).await;
                                drop(permit);
                            });
                        }
                        Err(e) => {
                            error!("Error accepting connection: {}", e);
                        }
                    }
                }
                signal = self.shutdown_rx.recv() => {
                    match signal {
                        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            info!("Shutdown signal received, shutting down...");
                            break;
                        }
                        // Unreachable while `self.shutdown_tx` is alive
                        Err(broadcast::error::RecvError::Closed) => continue,
                    }
                }
            }
        }

        Ok(())
    }
}
