//! WebSocket message hub server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin switchboard-server -- --addr 127.0.0.1:8080
//! ```

use clap::Parser;
use switchboard_server::Config;
use switchboard_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = switchboard_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
