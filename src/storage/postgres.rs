//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresCountryStore` backed by a `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! country-api = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::country::{Country, CountryPatch, Visibility};
use crate::core::error::{ApiError, ApiResult, CountryError, StorageError};
use crate::core::store::{CountryStore, DeleteOutcome};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const BACKEND: &str = "PostgreSQL";

const COUNTRY_COLUMNS: &str = "id, country_name, alpha_2_code, alpha_3_code, currencies, deleted";

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
        " AND deleted = FALSE"
    }
}

/// Create the `country` table if it does not exist.
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> ApiResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS country (
            id BIGINT PRIMARY KEY,
            country_name VARCHAR(30) NOT NULL,
            alpha_2_code VARCHAR(5) NOT NULL,
            alpha_3_code VARCHAR(5) NOT NULL,
            currencies VARCHAR(5) NOT NULL,
            deleted BOOLEAN NOT NULL DEFAULT FALSE
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error("Failed to create country table", e))?;

    Ok(())
}

/// Country store backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresCountryStore {
    pool: PgPool,
}

impl PostgresCountryStore {
    /// Create a new `PostgresCountryStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool for `url` and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> ApiResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await
            .map_err(|e| {
                ApiError::from(StorageError::Connection {
                    backend: BACKEND.to_string(),
                    message: e.to_string(),
                })
            })?;

        ensure_schema(&pool).await?;
        tracing::debug!("PostgreSQL country store ready");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CountryStore for PostgresCountryStore {
    async fn insert(&self, country: Country) -> ApiResult<Country> {
        // ON CONFLICT makes check-and-insert one statement; no row back means the id is taken
        let sql = format!(
            "INSERT INTO country ({cols}) VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO NOTHING RETURNING {cols}",
            cols = COUNTRY_COLUMNS
        );

        let row = sqlx::query_as::<_, CountryRow>(&sql)
            .bind(country.id)
            .bind(&country.country_name)
            .bind(&country.alpha_2_code)
            .bind(&country.alpha_3_code)
            .bind(&country.currencies)
            .bind(country.deleted)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to create country", e))?;

        row.map(into_country)
            .ok_or_else(|| CountryError::AlreadyExists { id: country.id }.into())
    }

    async fn find(&self, id: i64, visibility: Visibility) -> ApiResult<Option<Country>> {
        let sql = format!(
            "SELECT {} FROM country WHERE id = $1{}",
            COUNTRY_COLUMNS,
            live_filter(visibility)
        );

        let row = sqlx::query_as::<_, CountryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to get country", e))?;

        Ok(row.map(into_country))
    }

    async fn list(&self, visibility: Visibility) -> ApiResult<Vec<Country>> {
        let sql = format!(
            "SELECT {} FROM country WHERE TRUE{} ORDER BY id",
            COUNTRY_COLUMNS,
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
                country_name = COALESCE($1, country_name), \
                alpha_2_code = COALESCE($2, alpha_2_code), \
                alpha_3_code = COALESCE($3, alpha_3_code), \
                currencies = COALESCE($4, currencies) \
             WHERE id = $5{} \
             RETURNING {}",
            live_filter(visibility),
            COUNTRY_COLUMNS
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

        // Lock the row so a concurrent delete cannot slip between the two reads
        let current = sqlx::query_scalar::<_, bool>(
            "SELECT deleted FROM country WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| query_error("Failed to check country id", e))?;

        let outcome = match current {
            None => DeleteOutcome::Missing,
            Some(true) => DeleteOutcome::AlreadyDeleted,
            Some(false) => {
                sqlx::query("UPDATE country SET deleted = TRUE WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| query_error("Failed to delete country", e))?;
                DeleteOutcome::Deleted
            }
        };

        tx.commit().await.map_err(transaction_error)?;

        Ok(outcome)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
