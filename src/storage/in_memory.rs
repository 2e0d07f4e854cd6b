//! In-memory implementation of CountryStore for testing and development

use crate::core::country::{Country, CountryPatch, Visibility};
use crate::core::error::{ApiResult, CountryError, StorageError};
use crate::core::store::{CountryStore, DeleteOutcome};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory country store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// every write happens under a single write guard, so check-then-insert is
/// atomic. Records are keyed by id in a `BTreeMap` so listing is ordered.
#[derive(Clone, Default)]
pub struct InMemoryCountryStore {
    countries: Arc<RwLock<BTreeMap<i64, Country>>>,
}

impl InMemoryCountryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ApiResult<RwLockReadGuard<'_, BTreeMap<i64, Country>>> {
        self.countries.read().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire read lock: {}", e),
            }
            .into()
        })
    }

    fn write(&self) -> ApiResult<RwLockWriteGuard<'_, BTreeMap<i64, Country>>> {
        self.countries.write().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire write lock: {}", e),
            }
            .into()
        })
    }
}

#[async_trait]
impl CountryStore for InMemoryCountryStore {
    async fn insert(&self, country: Country) -> ApiResult<Country> {
        let mut countries = self.write()?;

        if countries.contains_key(&country.id) {
            return Err(CountryError::AlreadyExists { id: country.id }.into());
        }
        countries.insert(country.id, country.clone());

        Ok(country)
    }

    async fn find(&self, id: i64, visibility: Visibility) -> ApiResult<Option<Country>> {
        let countries = self.read()?;

        Ok(countries
            .get(&id)
            .filter(|c| c.is_visible(visibility))
            .cloned())
    }

    async fn list(&self, visibility: Visibility) -> ApiResult<Vec<Country>> {
        let countries = self.read()?;

        Ok(countries
            .values()
            .filter(|c| c.is_visible(visibility))
            .cloned()
            .collect())
    }

    async fn patch(
        &self,
        id: i64,
        patch: &CountryPatch,
        visibility: Visibility,
    ) -> ApiResult<Option<Country>> {
        let mut countries = self.write()?;

        let Some(country) = countries
            .get_mut(&id)
            .filter(|c| c.is_visible(visibility))
        else {
            return Ok(None);
        };
        country.apply(patch);

        Ok(Some(country.clone()))
    }

    async fn mark_deleted(&self, id: i64) -> ApiResult<DeleteOutcome> {
        let mut countries = self.write()?;

        Ok(match countries.get_mut(&id) {
            None => DeleteOutcome::Missing,
            Some(country) if country.deleted => DeleteOutcome::AlreadyDeleted,
            Some(country) => {
                country.deleted = true;
                DeleteOutcome::Deleted
            }
        })
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}
