//! REST API endpoints.
//!
//! Axum-based HTTP API for the aggregate rankings, player pages and the
//! tournament count.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::Filters;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Filter overrides as they arrive in a query string.
///
/// Values stay strings until here so malformed input gets a JSON 400 instead
/// of the extractor's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterQuery<'a> {
    pub game: Option<&'a str>,
    pub mode: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub lan: Option<&'a str>,
}

impl FilterQuery<'_> {
    /// Apply the overrides on top of `base`.
    pub fn apply(&self, base: &Filters) -> Result<Filters, ApiError> {
        let mut filters = base.clone();

        if let Some(game) = self.game {
            filters.game = Filters::selection(game);
        }
        if let Some(mode) = self.mode {
            filters.mode = Filters::selection(mode);
        }
        if let Some(from) = self.from {
            filters.year_range.0 = parse_year("from", from)?;
        }
        if let Some(to) = self.to {
            filters.year_range.1 = parse_year("to", to)?;
        }
        if let Some(lan) = self.lan {
            filters.lan_only = parse_flag("lan", lan)?;
        }

        let (min, max) = filters.year_range;
        if min > max {
            return Err(ApiError::BadRequest(format!(
                "year range {}..{} is empty",
                min, max
            )));
        }
        Ok(filters)
    }
}

fn parse_year(name: &str, value: &str) -> Result<i32, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{} must be a year, got {:?}", name, value)))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ApiError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be true or false, got {:?}",
            name, value
        ))),
    }
}

/// Parse an optional query value with `FromStr`, falling back to the default.
pub fn parse_param<T>(value: Option<&str>) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match value {
        Some(raw) => raw.parse().map_err(ApiError::BadRequest),
        None => Ok(T::default()),
    }
}

/// CORS policy for a configured origin; `*` allows any.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ApiError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ApiError::Internal(format!("invalid CORS origin: {}", origin)))?;
    Ok(layer.allow_origin(origin))
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/rankings",
            get(routes::rankings::get_rankings).post(routes::rankings::post_rankings),
        )
        .route(
            "/api/players/:name",
            get(routes::players::get_player).post(routes::players::post_player),
        )
        .route(
            "/api/tournaments/count",
            get(routes::tournaments::count_tournaments),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
