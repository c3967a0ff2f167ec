//! # Catalog Crate
//!
//! The in-memory book catalog and the recommendation rule that selects from it.
//!
//! ## Components
//!
//! - **catalog**: `Catalog`, built in or loaded from a JSON file
//! - **service**: `RecommendationService::recommend`, the only decision-making
//!   code in the system
//! - **error**: `CatalogError` (startup) and `RecommendError` (per call)
//!
//! ## Example Usage
//!
//! ```
//! use catalog::{Catalog, RecommendationService};
//! use schema::{Category, RecommendationRequest};
//!
//! let service = RecommendationService::new(Catalog::builtin());
//! let response = service
//!     .recommend(&RecommendationRequest::new(1, Category::Mystery, 1))
//!     .unwrap();
//! assert_eq!(response.recommendations.len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod service;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{CatalogError, RecommendError, Result};
pub use service::{RecommendationService, Selection};
