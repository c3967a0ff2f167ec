use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use client::{ClientConfig, DEFAULT_ADDR};

/// Bookworm web gateway
#[derive(Parser, Debug, Clone)]
#[command(name = "bookworm-gateway")]
#[command(about = "Serve the Bookworm home page backed by the recommendations service", long_about = None)]
pub struct GatewayConfig {
    /// Address the HTTP server listens on
    #[arg(long, env = "GATEWAY_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: SocketAddr,

    /// Downstream recommendations service
    #[arg(long, env = "RECOMMENDATIONS_ADDR", default_value = DEFAULT_ADDR)]
    pub recommendations_addr: String,

    /// Deadline for each recommendations call, in milliseconds
    #[arg(long, env = "RECOMMENDATIONS_TIMEOUT_MS", default_value_t = 5000)]
    pub timeout_ms: u64,
}

impl GatewayConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.recommendations_addr.clone())
            .with_request_timeout(Duration::from_millis(self.timeout_ms))
    }
}
