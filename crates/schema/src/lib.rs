//! # Schema Crate
//!
//! Wire contract shared by the recommendation server and its clients.
//!
//! ## Main Components
//!
//! - **types**: `Category`, `RecommendationRequest`, `BookRecommendation`,
//!   `RecommendationResponse`, generated from `proto/recommendations.proto`,
//!   plus their helper methods
//! - **error**: `UnknownCategory`
//! - **recommendations_client** / **recommendations_server**: tonic glue for
//!   the unary `bookworm.Recommendations/Recommend` call
//!
//! ## Example Usage
//!
//! ```ignore
//! use schema::{Category, RecommendationRequest};
//! use schema::recommendations_client::RecommendationsClient;
//!
//! let mut client = RecommendationsClient::connect("http://localhost:50051").await?;
//! let response = client
//!     .recommend(RecommendationRequest::new(1, Category::Mystery, 1))
//!     .await?
//!     .into_inner();
//! ```

pub mod error;
pub mod types;

mod generated {
    tonic::include_proto!("bookworm");
}

pub use error::UnknownCategory;
pub use generated::{recommendations_client, recommendations_server};
pub use types::{
    BookRecommendation, Category, RecommendationRequest, RecommendationResponse,
    DEFAULT_MAX_RESULTS,
};
