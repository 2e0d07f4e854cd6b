//! Country lifecycle on top of a [`CountryStore`]
//!
//! `CountryRepository` is the single place where the lifecycle rules live:
//! payload validation, conflict detection on create, soft-delete visibility
//! on reads and the non-idempotent delete. Backends only provide storage.

use crate::core::country::{Country, CountryPatch, NewCountry, Visibility};
use crate::core::error::{ApiResult, CountryError};
use crate::core::store::{CountryStore, DeleteOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Repository behavior knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Which records `update` may modify.
    ///
    /// `live` rejects patches on soft-deleted records with `NotFound`;
    /// `with_deleted` edits them in place without restoring them.
    pub patch_visibility: Visibility,
}

/// Owns the country records of one store and enforces soft-delete rules
#[derive(Clone)]
pub struct CountryRepository {
    store: Arc<dyn CountryStore>,
    config: RepositoryConfig,
}

impl CountryRepository {
    pub fn new(store: Arc<dyn CountryStore>) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    pub fn with_config(store: Arc<dyn CountryStore>, config: RepositoryConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> RepositoryConfig {
        self.config
    }

    /// Create a live record at the caller-chosen `id`
    pub async fn create(&self, id: i64, new: NewCountry) -> ApiResult<Country> {
        let new = new.normalized();
        new.validate()?;

        let country = self
            .store
            .insert(Country::from_new(id, new))
            .await
            .inspect_err(|e| {
                tracing::warn!(country_id = id, error = %e, "country create rejected");
            })?;

        tracing::info!(
            country_id = id,
            country_name = %country.country_name,
            backend = self.store.backend_name(),
            "country created"
        );
        Ok(country)
    }

    /// Fetch the record at `id`; soft-deleted records only with `WithDeleted`
    pub async fn get_by_id(&self, id: i64, visibility: Visibility) -> ApiResult<Country> {
        tracing::debug!(country_id = id, ?visibility, "fetching country");
        self.store
            .find(id, visibility)
            .await?
            .ok_or_else(|| CountryError::NotFound { id }.into())
    }

    /// All records visible under `visibility`, ordered by id
    pub async fn list(&self, visibility: Visibility) -> ApiResult<Vec<Country>> {
        tracing::debug!(?visibility, "listing countries");
        self.store.list(visibility).await
    }

    /// Overwrite the supplied non-empty fields of the record at `id`
    pub async fn update(&self, id: i64, patch: CountryPatch) -> ApiResult<Country> {
        let patch = patch.normalized();
        patch.validate()?;

        let updated = self
            .store
            .patch(id, &patch, self.config.patch_visibility)
            .await?
            .ok_or(CountryError::NotFound { id })
            .inspect_err(|_| {
                tracing::warn!(country_id = id, "cannot update missing country");
            })?;

        if !patch.is_empty() {
            tracing::info!(country_id = id, "country updated");
        }
        Ok(updated)
    }

    /// Flag the record at `id` as deleted.
    ///
    /// A second delete of the same record fails with `AlreadyDeleted`.
    pub async fn soft_delete(&self, id: i64) -> ApiResult<()> {
        match self.store.mark_deleted(id).await? {
            DeleteOutcome::Deleted => {
                tracing::info!(country_id = id, "country soft-deleted");
                Ok(())
            }
            DeleteOutcome::AlreadyDeleted => {
                tracing::warn!(country_id = id, "country already deleted");
                Err(CountryError::AlreadyDeleted { id }.into())
            }
            DeleteOutcome::Missing => Err(CountryError::NotFound { id }.into()),
        }
    }
}
