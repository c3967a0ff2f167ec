//! Recommendations client for calling the Bookworm service over gRPC.
//!
//! This crate wraps the generated tonic stub and provides:
//! - Channel setup from a configurable address, eager or lazy
//! - A typed `recommend` call with a client-side deadline
//! - `ClientError`, which keeps application errors (`InvalidArgument`)
//!   apart from transport errors (`Unavailable`, `DeadlineExceeded`)
//! - The [`Recommender`] capability trait, so callers such as the gateway can
//!   be tested against a fake
//! - [`BlockingRecommendationsClient`] for callers without an async runtime
//!
//! No call is retried automatically; [`ClientError::is_transient`] tells the
//! caller whether a retry could help.

use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::{debug, info, warn};

use schema::recommendations_client::RecommendationsClient as GrpcRecommendationsClient;
use schema::{RecommendationRequest, RecommendationResponse};

/// Re-exported so implementors of [`Recommender`] need no extra dependency.
pub use tonic::async_trait;

/// Default target, matching the server's default port.
pub const DEFAULT_ADDR: &str = "http://localhost:50051";

/// Errors that can occur when calling the recommendations service
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// The server rejected the request (e.g. unknown category)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server could not be reached or the connection broke
    #[error("recommendations service unavailable: {0}")]
    Unavailable(String),

    /// No answer within the configured deadline
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// Any other gRPC status
    #[error("rpc failed with {code:?}: {message}")]
    Rpc { code: Code, message: String },

    #[error("invalid service address `{addr}`: {reason}")]
    InvalidAddress { addr: String, reason: String },
}

impl ClientError {
    /// Map a gRPC status onto the client taxonomy.
    pub fn from_status(status: Status, deadline: Duration) -> Self {
        match status.code() {
            Code::InvalidArgument => ClientError::InvalidArgument(status.message().to_string()),
            Code::Unavailable => ClientError::Unavailable(status.message().to_string()),
            Code::DeadlineExceeded => ClientError::DeadlineExceeded(deadline),
            Code::Cancelled if is_timeout(&status) => ClientError::DeadlineExceeded(deadline),
            Code::Unknown if caused_by_transport(&status) => {
                ClientError::Unavailable(status.message().to_string())
            }
            code => ClientError::Rpc {
                code,
                message: status.message().to_string(),
            },
        }
    }

    /// True for failures a caller may reasonably retry or degrade on.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Unavailable(_) | ClientError::DeadlineExceeded(_)
        )
    }
}

/// tonic reports its own request timeout as `Cancelled` ("Timeout expired").
fn is_timeout(status: &Status) -> bool {
    let message = status.message().to_ascii_lowercase();
    message.contains("timeout") || message.contains("timed out") || message.contains("deadline")
}

fn caused_by_transport(status: &Status) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = status.source();
    while let Some(err) = source {
        if err.is::<tonic::transport::Error>() || err.is::<std::io::Error>() {
            return true;
        }
        source = err.source();
    }
    false
}

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `http://host:port`; a bare `host:port` gets `http://` prepended.
    pub addr: String,
    pub connect_timeout: Duration,
    /// Deadline for a whole call, from send to decoded response.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The address with a scheme, as tonic expects it.
    pub fn uri(&self) -> String {
        let addr = self.addr.trim();
        if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        }
    }

    fn endpoint(&self) -> Result<Endpoint, ClientError> {
        let uri = self.uri();
        Channel::from_shared(uri.clone())
            .map(|endpoint| endpoint.connect_timeout(self.connect_timeout))
            .map_err(|e| ClientError::InvalidAddress {
                addr: uri,
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Capability
// =============================================================================

/// Anything that can answer a recommendation request.
#[tonic::async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError>;
}

// =============================================================================
// Async client
// =============================================================================

/// Client for the recommendations service.
///
/// Cloning is cheap: clones share the same underlying channel.
#[derive(Debug, Clone)]
pub struct RecommendationsClient {
    client: GrpcRecommendationsClient<Channel>,
    config: ClientConfig,
}

impl RecommendationsClient {
    /// Dial the service now. An unreachable server is `Unavailable`.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        info!("Connecting to recommendations service at {}", config.uri());

        let channel = config
            .endpoint()?
            .connect()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        Ok(Self {
            client: GrpcRecommendationsClient::new(channel),
            config,
        })
    }

    /// Build the channel without dialing; the first call connects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(config: ClientConfig) -> Result<Self, ClientError> {
        info!("Using recommendations service at {} (lazy)", config.uri());

        let channel = config.endpoint()?.connect_lazy();
        Ok(Self {
            client: GrpcRecommendationsClient::new(channel),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request and wait for its response or a typed error.
    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError> {
        let deadline = self.config.request_timeout;
        debug!(
            user_id = request.user_id,
            category = request.category,
            max_results = ?request.max_results,
            "Sending recommend request"
        );

        let mut request = tonic::Request::new(request);
        request.set_timeout(deadline);

        // Generated clients take `&mut self`; clones share the channel.
        let mut client = self.client.clone();
        let response = match tokio::time::timeout(deadline, client.recommend(request)).await {
            Ok(Ok(response)) => response.into_inner(),
            Ok(Err(status)) => {
                let err = ClientError::from_status(status, deadline);
                warn!("Recommend call failed: {}", err);
                return Err(err);
            }
            Err(_) => {
                warn!("Recommend call exceeded its {:?} deadline", deadline);
                return Err(ClientError::DeadlineExceeded(deadline));
            }
        };

        debug!("Received {} recommendations", response.recommendations.len());
        Ok(response)
    }
}

#[tonic::async_trait]
impl Recommender for RecommendationsClient {
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError> {
        RecommendationsClient::recommend(self, request).await
    }
}

// =============================================================================
// Blocking client
// =============================================================================

/// Synchronous facade over [`RecommendationsClient`].
///
/// Owns a single-threaded runtime and blocks the calling thread for each
/// call. Do not use from inside another tokio runtime.
pub struct BlockingRecommendationsClient {
    client: RecommendationsClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingRecommendationsClient {
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let runtime = Self::runtime()?;
        let client = runtime.block_on(RecommendationsClient::connect(config))?;
        Ok(Self { client, runtime })
    }

    pub fn connect_lazy(config: ClientConfig) -> Result<Self, ClientError> {
        let runtime = Self::runtime()?;
        let client = {
            let _guard = runtime.enter();
            RecommendationsClient::connect_lazy(config)?
        };
        Ok(Self { client, runtime })
    }

    pub fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError> {
        self.runtime.block_on(self.client.recommend(request))
    }

    fn runtime() -> Result<tokio::runtime::Runtime, ClientError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ClientError::Unavailable(format!("failed to start client runtime: {e}")))
    }
}
