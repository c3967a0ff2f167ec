//! # RPC Server Harness
//!
//! Binds one [`RecommendationService`] to a TCP listener and serves the
//! `bookworm.Recommendations` gRPC service until a shutdown signal fires.
//!
//! ## Lifecycle
//! 1. [`RpcServer::bind`] binds the socket right away, so a port that is
//!    already taken is reported before anything else starts
//! 2. [`RpcServer::serve_with_shutdown`] accepts calls until `signal`
//!    resolves
//! 3. On shutdown no new calls are accepted, in-flight calls finish, then
//!    the listener is dropped and the port released
//!
//! ## Worker pool
//! Each call takes one permit from a semaphore sized by
//! [`ServerConfig::workers`] and runs `recommend` on the blocking pool.
//! Calls beyond the pool size queue for a permit.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use catalog::RecommendationService;
use schema::recommendations_server::{Recommendations, RecommendationsServer};
use schema::{RecommendationRequest, RecommendationResponse};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::{to_status, Result, ServerError};

/// gRPC adapter around the service and its worker pool.
#[derive(Clone)]
pub struct RecommendationsHandler {
    service: Arc<RecommendationService>,
    workers: Arc<Semaphore>,
}

impl RecommendationsHandler {
    pub fn new(service: Arc<RecommendationService>, workers: usize) -> Self {
        Self {
            service,
            workers: Arc::new(Semaphore::new(workers)),
        }
    }
}

#[tonic::async_trait]
impl Recommendations for RecommendationsHandler {
    async fn recommend(
        &self,
        request: Request<RecommendationRequest>,
    ) -> std::result::Result<Response<RecommendationResponse>, Status> {
        let remote = request.remote_addr();
        let request = request.into_inner();

        let _permit = self
            .workers
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Status::unavailable("worker pool is shut down"))?;

        let service = self.service.clone();
        let result = tokio::task::spawn_blocking(move || service.recommend(&request))
            .await
            .map_err(|e| {
                error!("Recommend worker failed: {}", e);
                Status::internal("recommendation worker failed")
            })?;

        match result {
            Ok(response) => Ok(Response::new(response)),
            Err(e) => {
                warn!(?remote, "Rejected recommend call: {}", e);
                Err(to_status(e))
            }
        }
    }
}

/// A bound, not yet serving, recommendation server.
pub struct RpcServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: RecommendationsHandler,
}

impl RpcServer {
    /// Bind the listener for `config.addr`.
    ///
    /// Fails with [`ServerError::Bind`] if the address is unavailable. Port 0
    /// picks an ephemeral port; see [`RpcServer::local_addr`].
    pub async fn bind(config: &ServerConfig, service: RecommendationService) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(config.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.addr,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;

        info!(
            "Recommendations server bound to {} ({} workers, {} books, {:?} selection)",
            local_addr,
            config.workers,
            service.catalog().len(),
            service.selection()
        );

        Ok(Self {
            listener,
            local_addr,
            handler: RecommendationsHandler::new(Arc::new(service), config.workers),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `signal` resolves, then drain in-flight calls and return.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr;
        info!("Serving bookworm.Recommendations on {}", addr);

        Server::builder()
            .add_service(RecommendationsServer::new(self.handler))
            .serve_with_incoming_shutdown(TcpListenerStream::new(self.listener), signal)
            .await?;

        info!("Recommendations server on {} stopped", addr);
        Ok(())
    }
}
