//! Server crate for the Bookworm recommendation service.
//!
//! This crate binds the `catalog` crate's `RecommendationService` to a gRPC
//! endpoint and owns the process lifecycle around it.

pub mod config;
pub mod error;
pub mod harness;

pub use config::{ServerConfig, DEFAULT_PORT, DEFAULT_WORKERS};
pub use error::{Result, ServerError};
pub use harness::{RecommendationsHandler, RpcServer};
