//! Factory repository.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{FactoryId, FactoryScope, FactoryStatus};

use super::RepositoryError;
use super::scope::push_factory_filter;
use crate::models::{CreateFactoryInput, Factory, FactorySummary, UpdateFactoryInput};

const FACTORY_COLUMNS: &str = "f.id, f.name, f.address, f.phone, f.status, f.capacity, f.memo, \
                               f.created_at, f.updated_at";

#[derive(Debug, sqlx::FromRow)]
struct FactoryRow {
    id: i32,
    name: String,
    address: String,
    phone: String,
    status: FactoryStatus,
    capacity: i32,
    memo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FactoryRow> for Factory {
    fn from(row: FactoryRow) -> Self {
        Self {
            id: FactoryId::new(row.id),
            name: row.name,
            address: row.address,
            phone: row.phone,
            status: row.status,
            capacity: row.capacity,
            memo: row.memo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FactorySummaryRow {
    #[sqlx(flatten)]
    factory: FactoryRow,
    active_manager_count: i64,
}

impl From<FactorySummaryRow> for FactorySummary {
    fn from(row: FactorySummaryRow) -> Self {
        Self {
            factory: row.factory.into(),
            active_manager_count: row.active_manager_count,
        }
    }
}

/// Repository for factory database operations.
pub struct FactoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FactoryRepository<'a> {
    /// Create a new factory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List factories visible in `scope`, with active manager counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, scope: &FactoryScope) -> Result<Vec<FactorySummary>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(FACTORY_COLUMNS).push(
            ", (SELECT COUNT(*) FROM stock.manager m \
                WHERE m.factory_id = f.id AND m.status = 'active') AS active_manager_count \
             FROM stock.factory f WHERE TRUE",
        );
        push_factory_filter(&mut qb, "f.id", scope);
        qb.push(" ORDER BY f.name, f.id");

        let rows = qb
            .build_query_as::<FactorySummaryRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a factory by id, with its active manager count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: FactoryId) -> Result<Option<FactorySummary>, RepositoryError> {
        let sql = format!(
            "SELECT {FACTORY_COLUMNS}, \
                (SELECT COUNT(*) FROM stock.manager m \
                 WHERE m.factory_id = f.id AND m.status = 'active') AS active_manager_count \
             FROM stock.factory f WHERE f.id = $1"
        );
        let row = sqlx::query_as::<_, FactorySummaryRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a factory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a check violation.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateFactoryInput) -> Result<Factory, RepositoryError> {
        let row = sqlx::query_as::<_, FactoryRow>(
            r"
            INSERT INTO stock.factory AS f (name, address, phone, status, capacity, memo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING f.id, f.name, f.address, f.phone, f.status, f.capacity, f.memo,
                      f.created_at, f.updated_at
            ",
        )
        .bind(input.name.trim())
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.status)
        .bind(input.capacity)
        .bind(&input.memo)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a factory. Absent fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the factory doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: FactoryId,
        input: &UpdateFactoryInput,
    ) -> Result<Factory, RepositoryError> {
        let row = sqlx::query_as::<_, FactoryRow>(
            r"
            UPDATE stock.factory AS f
            SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                status = COALESCE($5, status),
                capacity = COALESCE($6, capacity),
                memo = COALESCE($7, memo)
            WHERE f.id = $1
            RETURNING f.id, f.name, f.address, f.phone, f.status, f.capacity, f.memo,
                      f.created_at, f.updated_at
            ",
        )
        .bind(id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.status)
        .bind(input.capacity)
        .bind(&input.memo)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
