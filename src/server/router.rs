//! Route table of the country API

use crate::server::handlers::{
    AppState, delete_country, get_country, health_check, list_countries, patch_country,
    put_country,
};
use axum::{Router, routing::get};

/// Build country routes
///
/// - GET /country - List countries
/// - PUT /country/{id} - Create a country at a caller-chosen id
/// - GET /country/{id} - Get a country
/// - PATCH /country/{id} - Overwrite supplied fields
/// - DELETE /country/{id} - Soft delete
///
/// Reads accept `?with_deleted=true`.
pub fn build_country_routes(state: AppState) -> Router {
    Router::new()
        .route("/country", get(list_countries))
        .route(
            "/country/{id}",
            get(get_country)
                .put(put_country)
                .patch(patch_country)
                .delete(delete_country),
        )
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}
