//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteCountryStore` backed by a `sqlx::SqlitePool`, either a file
//! database (`sqlite://database.db?mode=rwc`) or an in-process one
//! (`sqlite::memory:`).
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag (enabled by default).
//!
//! # Schema
//!
//! A single `country` table. Soft-deleted rows stay in the table with
//! `deleted = 1`; the live view is the same table filtered on that column.

use crate::core::country::{Country, CountryPatch, Visibility};
use crate::core::error::{ApiError, ApiResult, CountryError, StorageError};
use crate::core::store::{CountryStore, DeleteOutcome};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

const BACKEND: &str = "SQLite";

const SELECT_COUNTRY: &str =
    "SELECT id, country_name, alpha_2_code, alpha_3_code, currencies, deleted FROM country";

type CountryRow = (i64, String, String, String, String, bool);

fn into_country(row: CountryRow) -> Country {
    let (id, country_name, alpha_2_code, alpha_3_code, currencies, deleted) = row;
    Country {
        id,
        country_name,
        alpha_2_code,
        alpha_3_code,
        currencies,
        deleted,
    }
}

fn query_error(context: &str, err: sqlx::Error) -> ApiError {
    StorageError::Query {
        backend: BACKEND.to_string(),
        message: format!("{}: {}", context, err),
    }
    .into()
}

fn transaction_error(err: sqlx::Error) -> ApiError {
    StorageError::Transaction {
        message: err.to_string(),
    }
    .into()
}

fn live_filter(visibility: Visibility) -> &'static str {
    if visibility.includes_deleted() {
        ""
    } else {
        " AND deleted = 0"
    }
}

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Create the `country` table if it does not exist.
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> ApiResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS country (
            id INTEGER NOT NULL PRIMARY KEY,
            country_name VARCHAR(30) NOT NULL,
            alpha_2_code VARCHAR(5) NOT NULL,
            alpha_3_code VARCHAR(5) NOT NULL,
            currencies VARCHAR(5) NOT NULL,
            deleted BOOLEAN NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error("Failed to create country table", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// SqliteCountryStore
// ---------------------------------------------------------------------------

/// Country store backed by SQLite.
///
/// # Example
///
/// ```rust,ignore
/// let store = SqliteCountryStore::connect("sqlite://database.db?mode=rwc", 5).await?;
/// let repository = CountryRepository::new(Arc::new(store));
/// ```
#[derive(Clone, Debug)]
pub struct SqliteCountryStore {
    pool: SqlitePool,
}

impl SqliteCountryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `url` and make sure the schema exists.
    ///
    /// In-memory databases live as long as their connection, so they get a
    /// single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> ApiResult<Self> {
        let connection_error = |message: String| -> ApiError {
            StorageError::Connection {
                backend: BACKEND.to_string(),
                message,
            }
            .into()
        };

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| connection_error(e.to_string()))?
            .create_if_missing(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| connection_error(e.to_string()))?;

        ensure_schema(&pool).await?;
        tracing::debug!(url, "SQLite country store ready");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CountryStore for SqliteCountryStore {
    async fn insert(&self, country: Country) -> ApiResult<Country> {
        // One statement: the primary key decides, including over soft-deleted rows
        sqlx::query(
            "INSERT INTO country (id, country_name, alpha_2_code, alpha_3_code, currencies, deleted) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(country.id)
        .bind(&country.country_name)
        .bind(&country.alpha_2_code)
        .bind(&country.alpha_3_code)
        .bind(&country.currencies)
        .bind(country.deleted)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                ApiError::from(CountryError::AlreadyExists { id: country.id })
            } else {
                query_error("Failed to create country", e)
            }
        })?;

        Ok(country)
    }

    async fn find(&self, id: i64, visibility: Visibility) -> ApiResult<Option<Country>> {
        let sql = format!("{} WHERE id = ?{}", SELECT_COUNTRY, live_filter(visibility));

        let row = sqlx::query_as::<_, CountryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to get country", e))?;

        Ok(row.map(into_country))
    }

    async fn list(&self, visibility: Visibility) -> ApiResult<Vec<Country>> {
        let sql = format!(
            "{} WHERE 1 = 1{} ORDER BY id",
            SELECT_COUNTRY,
            live_filter(visibility)
        );

        let rows = sqlx::query_as::<_, CountryRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("Failed to list countries", e))?;

        Ok(rows.into_iter().map(into_country).collect())
    }

    async fn patch(
        &self,
        id: i64,
        patch: &CountryPatch,
        visibility: Visibility,
    ) -> ApiResult<Option<Country>> {
        let sql = format!(
            "UPDATE country SET \
                country_name = COALESCE(?, country_name), \
                alpha_2_code = COALESCE(?, alpha_2_code), \
                alpha_3_code = COALESCE(?, alpha_3_code), \
                currencies = COALESCE(?, currencies) \
             WHERE id = ?{} \
             RETURNING id, country_name, alpha_2_code, alpha_3_code, currencies, deleted",
            live_filter(visibility)
        );

        let row = sqlx::query_as::<_, CountryRow>(&sql)
            .bind(patch.country_name.as_deref())
            .bind(patch.alpha_2_code.as_deref())
            .bind(patch.alpha_3_code.as_deref())
            .bind(patch.currencies.as_deref())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to update country", e))?;

        Ok(row.map(into_country))
    }

    async fn mark_deleted(&self, id: i64) -> ApiResult<DeleteOutcome> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        let result = sqlx::query("UPDATE country SET deleted = 1 WHERE id = ? AND deleted = 0")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| query_error("Failed to delete country", e))?;

        let outcome = if result.rows_affected() > 0 {
            DeleteOutcome::Deleted
        } else {
            let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM country WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| query_error("Failed to check country id", e))?;

            if exists.is_some() {
                DeleteOutcome::AlreadyDeleted
            } else {
                DeleteOutcome::Missing
            }
        };

        tx.commit().await.map_err(transaction_error)?;

        Ok(outcome)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
