use std::net::{IpAddr, SocketAddr};

use crate::error::Result;
pub use clap::Parser;
use shelf_app::state::AppConfig;
use shelf_types::CollectionKind;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "In-memory REST service for books and quotes")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 5000,
        env = "SHELF_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "SHELF_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "SHELF_COLLECTIONS",
        value_delimiter = ',',
        default_value = "books,quotes",
        help = "Collections to serve, comma separated"
    )]
    pub collections: Vec<CollectionKind>,

    #[arg(
        long,
        env = "SHELF_NO_SAMPLE_DATA",
        help = "Start with empty collections"
    )]
    pub no_sample_data: bool,

    #[arg(long, env = "SHELF_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.listen_address.parse()?;
        Ok(SocketAddr::from((ip, self.port)))
    }

    /// Configured collections without duplicates, in the given order.
    pub fn collections(&self) -> Vec<CollectionKind> {
        let mut kinds = Vec::with_capacity(self.collections.len());
        for kind in &self.collections {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            sample_data: !config.no_sample_data,
        }
    }
}
