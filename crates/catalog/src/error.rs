//! Error types for the catalog crate.

use std::path::PathBuf;

use schema::UnknownCategory;
use thiserror::Error;

/// Errors raised while building a [`Catalog`](crate::Catalog).
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not the expected JSON shape
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry names a category outside the closed domain
    #[error("catalog entry {index}: {source}")]
    UnknownCategory {
        index: usize,
        #[source]
        source: UnknownCategory,
    },

    /// The same book id appears twice under one category
    #[error("duplicate book id {id} in category {category}")]
    DuplicateItem { category: schema::Category, id: u32 },
}

/// Errors returned by [`RecommendationService::recommend`](crate::RecommendationService::recommend).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// Malformed client input. Never retried, never defaulted.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] UnknownCategory),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
