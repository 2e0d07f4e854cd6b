//! Request extractors that reject with the API's JSON error body

use crate::core::error::{ApiError, ValidationError};
use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;

/// Deserialized request body.
///
/// `application/x-www-form-urlencoded` bodies go through [`Form`], anything
/// else through [`Json`]. Rejections become `ValidationError::InvalidBody`
/// so they render like every other 400 of the API.
///
/// ```rust,ignore
/// async fn put_country(Payload(body): Payload<NewCountry>) -> ApiResult<Json<Country>> {
///     // ...
/// }
/// ```
pub struct Payload<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

fn invalid_body(message: String) -> ApiError {
    ValidationError::InvalidBody { message }.into()
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.body_text()))?;
            Ok(Payload(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.body_text()))?;
            Ok(Payload(value))
        }
    }
}

/// Deserialized query string.
///
/// Same as [`Query`] but a malformed query renders as
/// `ValidationError::InvalidQuery` instead of axum's plain-text 400.
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::from(ValidationError::InvalidQuery {
                message: e.body_text(),
            }))?;
        Ok(QueryParams(value))
    }
}
