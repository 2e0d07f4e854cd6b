//! Storage trait for country records

use crate::core::country::{Country, CountryPatch, Visibility};
use crate::core::error::ApiResult;
use async_trait::async_trait;

/// Result of a soft-delete attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was live and is now flagged deleted
    Deleted,
    /// The record exists but was already flagged deleted
    AlreadyDeleted,
    /// Nothing is stored at this id
    Missing,
}

/// Storage backend for country records.
///
/// Implementations own the rows and must make every method atomic with
/// respect to concurrent callers. Rows are never physically removed.
#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Insert a new record.
    ///
    /// Fails with `CountryError::AlreadyExists` when any record, live or
    /// soft-deleted, already occupies `country.id`.
    async fn insert(&self, country: Country) -> ApiResult<Country>;

    /// Find the record at `id` if it is visible under `visibility`
    async fn find(&self, id: i64, visibility: Visibility) -> ApiResult<Option<Country>>;

    /// All records visible under `visibility`, ordered by id
    async fn list(&self, visibility: Visibility) -> ApiResult<Vec<Country>>;

    /// Overwrite the fields set in `patch` on the record at `id`.
    ///
    /// Returns `None` when no record is visible under `visibility`.
    /// The soft-delete flag is left as is.
    async fn patch(
        &self,
        id: i64,
        patch: &CountryPatch,
        visibility: Visibility,
    ) -> ApiResult<Option<Country>>;

    /// Flag the record at `id` as deleted
    async fn mark_deleted(&self, id: i64) -> ApiResult<DeleteOutcome>;

    /// Backend name used in logs
    fn backend_name(&self) -> &'static str;
}
