use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use schema::UnknownCategory;
use thiserror::Error;

use crate::render;

/// Errors the gateway turns into an HTTP response of its own.
///
/// Failures of the recommendations call are not here: those degrade the page
/// instead of failing it.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    #[error("invalid value for `{field}`: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// The query string itself could not be decoded (e.g. a repeated key).
    #[error("malformed query string: {0}")]
    InvalidQuery(String),
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        GatewayError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match self {
            GatewayError::UnknownCategory(_)
            | GatewayError::InvalidNumber { .. }
            | GatewayError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        };
        (status, Html(render::error_page(&self.to_string()))).into_response()
    }
}
