//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryCountryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCountryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCountryStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::error::{ApiResult, ConfigError};
use crate::core::store::CountryStore;
use std::sync::Arc;

/// Open the store selected by `config`.
///
/// SQL backends create their schema before returning. Selecting a backend
/// whose feature was not compiled in fails with a `ConfigError`.
pub async fn connect(config: &StorageConfig) -> ApiResult<Arc<dyn CountryStore>> {
    tracing::info!(backend = ?config.backend, "opening country store");

    match config.backend {
        StorageBackend::InMemory => Ok(Arc::new(InMemoryCountryStore::new())),

        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            let url = config.url()?;
            let store = SqliteCountryStore::connect(&url, config.max_connections).await?;
            Ok(Arc::new(store))
        }

        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let url = config.url()?;
            let store = PostgresCountryStore::connect(&url, config.max_connections).await?;
            Ok(Arc::new(store))
        }

        #[allow(unreachable_patterns)]
        other => Err(ConfigError::InvalidValue {
            field: "storage.backend".to_string(),
            value: other.as_str().to_string(),
            message: format!("crate was built without the `{}` feature", other.as_str()),
        }
        .into()),
    }
}
