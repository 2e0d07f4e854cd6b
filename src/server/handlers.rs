//! HTTP handlers for country operations
//!
//! Handlers only translate between HTTP and [`CountryRepository`]; every
//! lifecycle rule lives in the repository.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::country::{Country, CountryPatch, NewCountry, Visibility};
use crate::core::error::{ApiResult, ValidationError};
use crate::core::repository::CountryRepository;
use crate::server::extract::{Payload, QueryParams};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: CountryRepository,
}

/// Query string accepted by the read endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ReadParams {
    /// Read through soft deletes
    #[serde(default)]
    pub with_deleted: Option<bool>,
}

impl ReadParams {
    fn visibility(&self) -> Visibility {
        Visibility::from_flag(self.with_deleted.unwrap_or(false))
    }
}

/// Parse the `{id}` path segment.
///
/// Taken as a string so a non-integer id renders as a regular
/// `VALIDATION_ERROR` instead of axum's plain-text rejection.
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        ValidationError::InvalidId {
            value: raw.to_string(),
        }
        .into()
    })
}

/// PUT /country/{id}
pub async fn put_country(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<NewCountry>,
) -> ApiResult<(StatusCode, Json<Country>)> {
    let id = parse_id(&id)?;
    let country = state.repository.create(id, body).await?;
    Ok((StatusCode::CREATED, Json(country)))
}

/// GET /country/{id}
pub async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<String>,
    QueryParams(params): QueryParams<ReadParams>,
) -> ApiResult<Json<Country>> {
    let id = parse_id(&id)?;
    let country = state
        .repository
        .get_by_id(id, params.visibility())
        .await?;
    Ok(Json(country))
}

/// GET /country
pub async fn list_countries(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ReadParams>,
) -> ApiResult<Json<Vec<Country>>> {
    let countries = state.repository.list(params.visibility()).await?;
    Ok(Json(countries))
}

/// PATCH /country/{id}
pub async fn patch_country(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<CountryPatch>,
) -> ApiResult<Json<Country>> {
    let id = parse_id(&id)?;
    let country = state.repository.update(id, body).await?;
    Ok(Json(country))
}

/// DELETE /country/{id}
pub async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.repository.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health and /healthz
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "country-api"
    }))
}
