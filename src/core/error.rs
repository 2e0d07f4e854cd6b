//! Typed error handling for the country API
//!
//! Every fallible operation returns [`ApiResult`]. The top-level [`ApiError`]
//! wraps a category-specific error so callers can match precisely, and it
//! renders itself as an HTTP response through axum's [`IntoResponse`].
//!
//! # Error Categories
//!
//! - [`CountryError`]: lifecycle errors (missing record, occupied id, double delete)
//! - [`ValidationError`]: malformed or incomplete input
//! - [`StorageError`]: failures reported by a storage backend
//! - [`ConfigError`]: configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match repository.get_by_id(7, Visibility::Live).await {
//!     Ok(country) => println!("{}", country.country_name),
//!     Err(ApiError::Country(CountryError::NotFound { id })) => println!("no country {id}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type of the country API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Country lifecycle errors
    #[error(transparent)]
    Country(#[from] CountryError),

    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Country(e) => e.status_code(),
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Country(e) => e.error_code(),
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Country(e) => Some(serde_json::json!({ "id": e.id() })),
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Country Errors
// =============================================================================

/// Errors raised by the country lifecycle
#[derive(Debug, Error)]
pub enum CountryError {
    /// No record visible at this id
    #[error("country with id '{id}' not found")]
    NotFound { id: i64 },

    /// The id is occupied, live or soft-deleted
    #[error("country with id '{id}' already exists")]
    AlreadyExists { id: i64 },

    /// Delete on a record that is already soft-deleted
    #[error("country with id '{id}' is already deleted")]
    AlreadyDeleted { id: i64 },
}

impl CountryError {
    pub fn id(&self) -> i64 {
        match self {
            CountryError::NotFound { id }
            | CountryError::AlreadyExists { id }
            | CountryError::AlreadyDeleted { id } => *id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CountryError::NotFound { .. } => StatusCode::NOT_FOUND,
            CountryError::AlreadyExists { .. } => StatusCode::CONFLICT,
            CountryError::AlreadyDeleted { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CountryError::NotFound { .. } => "COUNTRY_NOT_FOUND",
            CountryError::AlreadyExists { .. } => "COUNTRY_ALREADY_EXISTS",
            CountryError::AlreadyDeleted { .. } => "COUNTRY_ALREADY_DELETED",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Request body could not be decoded
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Path id is not an integer
    #[error("Invalid country id: '{value}'")]
    InvalidId { value: String },

    /// Query string could not be decoded
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldValidationError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    #[error("Transaction error: {message}")]
    Transaction { message: String },

    /// A lock guarding in-memory state was poisoned by a panicking writer
    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", describe_file(.file))]
    Parse {
        file: Option<String>,
        message: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

fn describe_file(file: &Option<String>) -> String {
    file.as_deref()
        .map(|f| format!(" file '{f}'"))
        .unwrap_or_default()
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for country API operations
pub type ApiResult<T> = Result<T, ApiError>;
