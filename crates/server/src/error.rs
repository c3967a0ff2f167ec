//! Error types for the server harness.

use std::net::SocketAddr;

use catalog::{CatalogError, RecommendError};
use thiserror::Error;
use tonic::Status;

/// Startup and lifecycle failures. All of them are fatal for the process.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Listening socket could not be bound (port in use, bad address)
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid server configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The transport stopped with an error while serving
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Map a per-call service error onto the gRPC status the client sees.
pub fn to_status(err: RecommendError) -> Status {
    match err {
        RecommendError::InvalidArgument(_) => Status::invalid_argument(err.to_string()),
    }
}
