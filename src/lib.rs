//! # country-api
//!
//! A REST API over a single "country" resource with soft deletion.
//!
//! ## Features
//!
//! - **Caller-chosen ids**: `PUT /country/{id}` creates, and conflicts on any occupied id
//! - **Soft delete**: `DELETE` only flags a record; reads hide it unless asked
//! - **Partial updates**: `PATCH` overwrites only the non-empty fields supplied
//! - **Pluggable storage**: in-memory, SQLite (default) and PostgreSQL backends
//! - **Configuration-Based**: YAML file plus environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use country_api::prelude::*;
//!
//! let repository = CountryRepository::new(Arc::new(InMemoryCountryStore::new()));
//!
//! repository
//!     .create(0, NewCountry::new("Afghanistan", "AF", "AFG", "AFN"))
//!     .await?;
//! repository.soft_delete(0).await?;
//!
//! // Hidden by default, still stored
//! assert!(repository.get_by_id(0, Visibility::Live).await.is_err());
//! assert!(repository.get_by_id(0, Visibility::WithDeleted).await?.deleted);
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        country::{Country, CountryPatch, NewCountry, Visibility},
        error::{ApiError, ApiResult, ConfigError, CountryError, StorageError, ValidationError},
        repository::{CountryRepository, RepositoryConfig},
        store::{CountryStore, DeleteOutcome},
    };

    // === Storage ===
    pub use crate::storage::InMemoryCountryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresCountryStore;
    #[cfg(feature = "sqlite")]
    pub use crate::storage::SqliteCountryStore;

    // === Config ===
    pub use crate::config::{AppConfig, ServerConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
