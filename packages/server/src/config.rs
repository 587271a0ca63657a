//! Command-line configuration.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

use crate::hub::HubConfig;

/// Real-time WebSocket message hub.
#[derive(Debug, Clone, Parser)]
#[command(name = "switchboard-server", version, about)]
pub struct Config {
    /// HTTP service address
    #[arg(long, env = "SWITCHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Directory served at `/` (test frontend)
    #[arg(long, default_value = "./static")]
    pub static_dir: PathBuf,

    /// Close connections that have not authenticated within this many seconds
    #[arg(long)]
    pub auth_timeout_secs: Option<u64>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

impl Config {
    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            auth_timeout: self.auth_timeout_secs.map(Duration::from_secs),
        }
    }
}
