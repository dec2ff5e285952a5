//! Selection option repository.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{OptionType, RecordStatus, SelectionOptionId};

use super::RepositoryError;
use crate::models::{CreateOptionInput, OptionFilter, SelectionOption};

const OPTION_COLUMNS: &str = "id, option_type, value, status, sort_order, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SelectionOptionRow {
    id: i32,
    option_type: OptionType,
    value: String,
    status: RecordStatus,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SelectionOptionRow> for SelectionOption {
    fn from(row: SelectionOptionRow) -> Self {
        Self {
            id: SelectionOptionId::new(row.id),
            option_type: row.option_type,
            value: row.value,
            status: row.status,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for selection option database operations.
pub struct SelectionOptionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SelectionOptionRepository<'a> {
    /// Create a new selection option repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active options ordered by type, sort order and value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &OptionFilter) -> Result<Vec<SelectionOption>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(OPTION_COLUMNS)
            .push(" FROM stock.selection_option WHERE status = 'active'");
        if let Some(option_type) = filter.option_type {
            qb.push(" AND option_type = ").push_bind(option_type);
        }
        qb.push(" ORDER BY option_type, sort_order, value");

        let rows = qb
            .build_query_as::<SelectionOptionRow>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create an option.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the value already exists for
    /// the type, active or not.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateOptionInput) -> Result<SelectionOption, RepositoryError> {
        let sql = format!(
            "INSERT INTO stock.selection_option (option_type, value, sort_order) \
             VALUES ($1, $2, $3) RETURNING {OPTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SelectionOptionRow>(&sql)
            .bind(input.option_type)
            .bind(input.value.trim())
            .bind(input.sort_order)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Set an option's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the option doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: SelectionOptionId,
        status: RecordStatus,
    ) -> Result<SelectionOption, RepositoryError> {
        let sql = format!(
            "UPDATE stock.selection_option SET status = $2 WHERE id = $1 RETURNING {OPTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SelectionOptionRow>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Insert or re-activate an option, updating its sort order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        option_type: OptionType,
        value: &str,
        sort_order: i32,
    ) -> Result<SelectionOption, RepositoryError> {
        let sql = format!(
            "INSERT INTO stock.selection_option (option_type, value, sort_order) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT selection_option_type_value_key \
             DO UPDATE SET sort_order = EXCLUDED.sort_order, status = 'active' \
             RETURNING {OPTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SelectionOptionRow>(&sql)
            .bind(option_type)
            .bind(value.trim())
            .bind(sort_order)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Deactivate every option of a type. Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn deactivate_all(&self, option_type: OptionType) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE stock.selection_option SET status = 'deactivated' \
             WHERE option_type = $1 AND status = 'active'",
        )
        .bind(option_type)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
