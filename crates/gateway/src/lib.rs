//! # Gateway Crate
//!
//! HTTP front end for the recommendations service. Each page view makes one
//! `Recommend` call through an injected [`Recommender`] and renders the
//! result.
//!
//! ## Routes
//!
//! - `GET /` home page; optional `user_id`, `category`, `max_results` query
//!   parameters (defaults: `1`, `self-help`, `3`)
//! - `GET /healthz` liveness
//!
//! A failed recommendations call still renders the page, with an empty list
//! and a notice. Only a malformed query string is an HTTP error (400).

pub mod config;
pub mod error;
pub mod render;

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use client::Recommender;
use schema::{Category, RecommendationRequest};

pub use config::GatewayConfig;
pub use error::GatewayError;

pub const DEFAULT_USER_ID: u32 = 1;
pub const DEFAULT_CATEGORY: Category = Category::SelfHelp;
pub const DEFAULT_MAX_RESULTS: u32 = 3;

/// Shared, read-only handler state. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<dyn Recommender>,
}

impl AppState {
    pub fn new(recommender: Arc<dyn Recommender>) -> Self {
        Self { recommender }
    }
}

/// Raw query parameters. Parsed by hand so bad input gets our error page.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub max_results: Option<String>,
}

impl PageParams {
    pub fn into_request(self) -> Result<(Category, RecommendationRequest), GatewayError> {
        let user_id = parse_number("user_id", self.user_id, DEFAULT_USER_ID)?;
        let max_results = parse_number("max_results", self.max_results, DEFAULT_MAX_RESULTS)?;
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_CATEGORY,
            Some(name) => name.parse()?,
        };

        Ok((
            category,
            RecommendationRequest::new(user_id, category, max_results),
        ))
    }
}

fn parse_number(field: &'static str, raw: Option<String>, default: u32) -> Result<u32, GatewayError> {
    match raw {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| GatewayError::InvalidNumber { field, value }),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Html<String>, GatewayError> {
    let Query(params) = query?;
    let (category, request) = params.into_request()?;

    let html = match state.recommender.recommend(request).await {
        Ok(response) => {
            info!(
                %category,
                count = response.recommendations.len(),
                "Rendering home page"
            );
            render::home_page(category, &response.recommendations, None)
        }
        Err(e) => {
            warn!(%category, transient = e.is_transient(), "Rendering degraded home page: {}", e);
            render::home_page(category, &[], Some(render::UNAVAILABLE_NOTICE))
        }
    };

    Ok(Html(html))
}

async fn healthz() -> &'static str {
    "ok"
}
