//! # Recommendation Service
//!
//! The single business rule of the system: given a request, pick at most
//! `effective_max_results` books of the requested category.
//!
//! - fewer books than asked for → all of them, no padding, no error
//! - a limit of zero → an empty list
//! - an unknown category → [`RecommendError::InvalidArgument`]
//!
//! The service holds nothing but a read-only [`Catalog`], so `recommend`
//! takes `&self` and can be called from any number of workers at once.

use std::str::FromStr;

use rand::seq::index;
use schema::{BookRecommendation, Category, RecommendationRequest, RecommendationResponse};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::RecommendError;

/// How books are picked when a category has more than the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// First `n` books in catalog order. Deterministic.
    #[default]
    InOrder,
    /// Uniform sample of `n` distinct books.
    Random,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-order" | "in_order" | "ordered" => Ok(Selection::InOrder),
            "random" => Ok(Selection::Random),
            other => Err(format!("unknown selection `{other}` (expected in-order or random)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationService {
    catalog: Catalog,
    selection: Selection,
}

impl RecommendationService {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
        }
    }

    /// Builder-style override of the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Answer one request.
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, RecommendError> {
        let category = request.category()?;
        let limit = request.effective_max_results() as usize;

        let books = self.books_for(category);
        let recommendations = self.select(books, limit);

        debug!(
            user_id = request.user_id,
            %category,
            limit,
            returned = recommendations.len(),
            "recommend called"
        );

        Ok(RecommendationResponse::from(recommendations))
    }

    fn books_for(&self, category: Category) -> &[BookRecommendation] {
        // Exhaustive on purpose: a new variant must be wired up here.
        match category {
            Category::Mystery | Category::ScienceFiction | Category::SelfHelp => {
                self.catalog.books(category)
            }
        }
    }

    fn select(&self, books: &[BookRecommendation], limit: usize) -> Vec<BookRecommendation> {
        let amount = limit.min(books.len());
        match self.selection {
            Selection::InOrder => books[..amount].to_vec(),
            Selection::Random => {
                let mut rng = rand::rng();
                index::sample(&mut rng, books.len(), amount)
                    .into_iter()
                    .map(|i| books[i].clone())
                    .collect()
            }
        }
    }
}

impl Default for RecommendationService {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{UnknownCategory, DEFAULT_MAX_RESULTS};
    use std::collections::HashSet;

    fn request(category: Category, max_results: u32) -> RecommendationRequest {
        RecommendationRequest::new(1, category, max_results)
    }

    #[test]
    fn test_response_one_result() {
        let service = RecommendationService::default();
        let response = service.recommend(&request(Category::Mystery, 1)).unwrap();
        assert_eq!(response.recommendations.len(), 1);
    }

    #[test]
    fn test_in_order_returns_catalog_prefix() {
        let service = RecommendationService::default();
        let response = service.recommend(&request(Category::SelfHelp, 2)).unwrap();
        let ids: Vec<u32> = response.recommendations.iter().map(|b| b.id).collect();
        assert_eq!(ids, [7, 8]);
    }

    #[test]
    fn test_more_than_available_returns_everything() {
        let service = RecommendationService::default();
        let response = service.recommend(&request(Category::ScienceFiction, 50)).unwrap();
        assert_eq!(response.recommendations.len(), 3);
    }

    #[test]
    fn test_zero_returns_empty() {
        let service = RecommendationService::default();
        for category in Category::ALL {
            let response = service.recommend(&request(category, 0)).unwrap();
            assert!(response.recommendations.is_empty());
        }
    }

    #[test]
    fn test_unset_limit_uses_default() {
        let service = RecommendationService::new(
            Catalog::from_entries((1..=10).map(|id| crate::CatalogEntry {
                category: "mystery".into(),
                id,
                title: format!("Book {id}"),
                author: String::new(),
            }))
            .unwrap(),
        );
        let mut req = request(Category::Mystery, 0);
        req.max_results = None;

        let response = service.recommend(&req).unwrap();
        assert_eq!(response.recommendations.len(), DEFAULT_MAX_RESULTS as usize);
    }

    #[test]
    fn test_unknown_category_is_invalid_argument() {
        let service = RecommendationService::default();
        let req = RecommendationRequest {
            user_id: 1,
            category: 99,
            max_results: Some(3),
        };
        assert_eq!(
            service.recommend(&req),
            Err(RecommendError::InvalidArgument(UnknownCategory::Value(99)))
        );
    }

    #[test]
    fn test_empty_category_is_not_an_error() {
        let service = RecommendationService::new(Catalog::new());
        let response = service.recommend(&request(Category::Mystery, 3)).unwrap();
        assert!(response.recommendations.is_empty());
    }

    #[test]
    fn test_random_selection_is_distinct_and_from_category() {
        let service = RecommendationService::default().with_selection(Selection::Random);
        let allowed: HashSet<u32> = service
            .catalog()
            .books(Category::Mystery)
            .iter()
            .map(|b| b.id)
            .collect();

        for _ in 0..20 {
            let response = service.recommend(&request(Category::Mystery, 2)).unwrap();
            let ids: HashSet<u32> = response.recommendations.iter().map(|b| b.id).collect();
            assert_eq!(ids.len(), 2);
            assert!(ids.is_subset(&allowed));
        }
    }

    #[test]
    fn test_selection_from_str() {
        assert_eq!("random".parse::<Selection>(), Ok(Selection::Random));
        assert_eq!("In-Order".parse::<Selection>(), Ok(Selection::InOrder));
        assert!("shuffle".parse::<Selection>().is_err());
    }
}
