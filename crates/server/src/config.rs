//! Server configuration.

use std::net::{Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use catalog::{Catalog, RecommendationService, Selection};

use crate::error::{Result, ServerError};

/// Default listen port, shared with the client's default target.
pub const DEFAULT_PORT: u16 = 50051;

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 10;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on. Defaults to `[::]:50051`.
    pub addr: SocketAddr,
    /// Maximum number of calls served at the same time.
    pub workers: usize,
    pub selection: Selection,
    /// JSON catalog to serve instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv6Addr::UNSPECIFIED, DEFAULT_PORT)),
            workers: DEFAULT_WORKERS,
            selection: Selection::default(),
            catalog_path: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ServerError::InvalidConfig(
                "worker pool size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the one service instance this process will serve.
    pub fn build_service(&self) -> Result<RecommendationService> {
        let catalog = match &self.catalog_path {
            Some(path) => Catalog::from_json_file(path)?,
            None => Catalog::builtin(),
        };
        Ok(RecommendationService::new(catalog).with_selection(self.selection))
    }
}
