//! The kestrel server library

#![deny(unreachable_pub)]

pub mod config;
pub mod connection;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::Server;

pub type Result<T> = std::result::Result<T, error::ServerError>;
