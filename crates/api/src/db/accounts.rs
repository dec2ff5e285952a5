//! Account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use factory_inventory_core::AccountId;

use super::RepositoryError;
use crate::models::{Account, CreateAccountInput};

/// Internal row type for account queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    is_staff: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let id = AccountId::parse(&row.id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid account id in database: {e}"))
        })?;

        Ok(Self {
            id,
            email: row.email,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, email, is_staff, is_superuser, created_at, updated_at
            FROM stock.account
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateAccountInput) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO stock.account (id, email, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, is_staff, is_superuser, created_at, updated_at
            ",
        )
        .bind(input.id.as_str())
        .bind(&input.email)
        .bind(input.is_staff)
        .bind(input.is_superuser)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }
}
