//! Recommendations server binary.
//!
//! Serves `bookworm.Recommendations` until Ctrl+C or SIGTERM. Exits non-zero
//! if the listen address cannot be bound.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use catalog::Selection;
use server::{RpcServer, ServerConfig, DEFAULT_WORKERS};

/// Bookworm recommendation service
#[derive(Parser, Debug)]
#[command(name = "recommendations-server")]
#[command(about = "Serve book recommendations over gRPC", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "RECOMMENDATIONS_LISTEN_ADDR", default_value = "[::]:50051")]
    addr: SocketAddr,

    /// Size of the worker pool (concurrent calls)
    #[arg(long, env = "RECOMMENDATIONS_WORKERS", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// How books are picked: in-order or random
    #[arg(long, default_value = "in-order")]
    selection: Selection,

    /// JSON catalog file to serve instead of the built-in books
    #[arg(long, env = "RECOMMENDATIONS_CATALOG")]
    catalog: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,server=debug,catalog=debug")),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        addr: args.addr,
        workers: args.workers,
        selection: args.selection,
        catalog_path: args.catalog,
    };
    config.validate()?;

    // Worker threads and the blocking pool are both sized by the pool setting.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .max_blocking_threads(config.workers)
        .enable_all()
        .build()
        .context("Building tokio runtime")?;

    runtime.block_on(run(config))
}

async fn run(config: ServerConfig) -> Result<()> {
    let service = config.build_service().context("Loading catalog")?;

    let server = match RpcServer::bind(&config, service).await {
        Ok(server) => server,
        Err(e) => {
            error!("Fatal: {}", e);
            return Err(e.into());
        }
    };

    server.serve_with_shutdown(shutdown_signal()).await?;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight calls");
}
