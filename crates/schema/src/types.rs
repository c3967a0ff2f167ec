//! Wire messages for the `bookworm.Recommendations` service.
//!
//! The messages are generated from `proto/recommendations.proto`; the field
//! tags there are the wire contract. A client and server built independently
//! stay compatible as long as no tag is reused. Fields a reader does not know
//! about are skipped on decode.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownCategory;

pub use crate::generated::{
    BookRecommendation, Category, RecommendationRequest, RecommendationResponse,
};

/// Number of recommendations returned when a request leaves `max_results` unset.
pub const DEFAULT_MAX_RESULTS: u32 = 3;

// =============================================================================
// Category
// =============================================================================

// Closed set; the discriminants are the wire values and must never be
// renumbered.
impl Category {
    /// Every category, in wire order.
    pub const ALL: [Category; 3] = [
        Category::Mystery,
        Category::ScienceFiction,
        Category::SelfHelp,
    ];

    /// Stable kebab-case name used on the command line and in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Mystery => "mystery",
            Category::ScienceFiction => "science-fiction",
            Category::SelfHelp => "self-help",
        }
    }

    /// Human-readable heading, e.g. "Science Fiction".
    pub fn label(self) -> &'static str {
        match self {
            Category::Mystery => "Mystery",
            Category::ScienceFiction => "Science Fiction",
            Category::SelfHelp => "Self Help",
        }
    }

    /// Resolve a raw wire value into a category.
    pub fn from_wire(value: i32) -> Result<Self, UnknownCategory> {
        Category::try_from(value).map_err(|_| UnknownCategory::Value(value))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive; `_` and ` ` are accepted in place of `-`, so
    /// `SELF_HELP` (the wire enum name) parses too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| UnknownCategory::Name(s.to_string()))
    }
}

// =============================================================================
// Messages
// =============================================================================

impl RecommendationRequest {
    pub fn new(user_id: u32, category: Category, max_results: u32) -> Self {
        Self {
            user_id,
            category: category.into(),
            max_results: Some(max_results),
        }
    }

    /// The requested category, or an error if the wire value is unknown.
    ///
    /// `category` is a plain `int32` on the wire, so there is no accessor
    /// that maps an unknown value to a default.
    pub fn category(&self) -> Result<Category, UnknownCategory> {
        Category::from_wire(self.category)
    }

    /// Limit after applying the unset-means-default policy.
    pub fn effective_max_results(&self) -> u32 {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

impl BookRecommendation {
    pub fn new(id: u32, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
        }
    }
}

impl From<Vec<BookRecommendation>> for RecommendationResponse {
    fn from(recommendations: Vec<BookRecommendation>) -> Self {
        Self { recommendations }
    }
}
