use anyhow::Result;
use clap::{Parser, Subcommand};
use kestrel_client::{Client, DEFAULT_CLIENT_ID};
use kestrel_protocol::ApiKey;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1:9092")]
    broker: SocketAddr,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the broker which APIs and versions it supports
    ApiVersions {
        /// ApiVersions request version to send
        #[arg(short, long, default_value = "4")]
        version: i16,
        /// Client id to send; pass an empty value to send a null client id
        #[arg(long, default_value = DEFAULT_CLIENT_ID)]
        client_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    kestrel_common::logging::init_logging(tracing::Level::INFO);
    let args = Args::parse();

    let mut client = Client::connect(args.broker).await?;

    match args.command {
        Commands::ApiVersions { version, client_id } => {
            client.set_client_id((!client_id.is_empty()).then_some(client_id));
            let response = client.api_versions(version).await?;
            println!(
                "error_code: {} ({})",
                response.error_code.to_i16(),
                response.error_code
            );
            for api in &response.apis {
                let name = ApiKey::from_i16(api.api_key)
                    .map(|key| format!("{:?}", key))
                    .unwrap_or_else(|| "Unknown".to_string());
                println!(
                    "{:>4} {:<24} v{}-v{}",
                    api.api_key, name, api.min_version, api.max_version
                );
            }
            println!("throttle_time_ms: {}", response.throttle_time_ms);
        }
    }

    Ok(())
}
