use anyhow::Result;
use clap::Parser;
use kestrel_protocol::ApiRegistry;
use kestrel_server::{Server, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, Level};

/// Kafka handshake broker: answers ApiVersions negotiation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = kestrel_server::config::DEFAULT_BIND)]
    bind: SocketAddr,

    /// Maximum number of concurrent connections
    #[arg(long, default_value = "1024")]
    max_connections: usize,

    /// Largest request frame accepted, in bytes
    #[arg(long, default_value_t = kestrel_protocol::DEFAULT_MAX_FRAME_BYTES)]
    max_frame_bytes: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind: args.bind,
            max_connections: args.max_connections,
            max_frame_bytes: args.max_frame_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    kestrel_common::logging::init_logging(args.log_level);

    info!("Starting kestrel broker...");
    info!("Binding to {}", args.bind);
    info!("Max connections: {}", args.max_connections);
    info!("Max frame bytes: {}", args.max_frame_bytes);

    let config = ServerConfig::from(args);
    let registry = Arc::new(ApiRegistry::default());
    let (server, _shutdown_sender) = Server::bind(config, registry).await?;

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    server_handle.await?;

    info!("Server shutting down");

    Ok(())
}
