//! Manager assignment repository.
//!
//! Assignments are never hard-deleted; deactivation flips `status`.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{
    AccountId, FactoryId, FactoryScope, ManagerId, ManagerRole, PermissionSet, RecordStatus,
};

use super::RepositoryError;
use super::scope::push_factory_filter;
use crate::models::{Manager, ManagerFilter, UpdateManagerInput};

const MANAGER_SELECT: &str = "\
    SELECT m.id, m.account_id, a.email AS account_email, m.factory_id, \
           f.name AS factory_name, m.role, m.can_manage_inventory, \
           m.can_manage_stocktaking, m.can_view_reports, m.can_admin, m.status, \
           m.memo, m.assigned_at, m.created_at, m.updated_at \
    FROM stock.manager m \
    JOIN stock.account a ON a.id = m.account_id \
    JOIN stock.factory f ON f.id = m.factory_id";

#[derive(Debug, sqlx::FromRow)]
#[allow(clippy::struct_excessive_bools)]
struct ManagerRow {
    id: i32,
    account_id: String,
    account_email: String,
    factory_id: i32,
    factory_name: String,
    role: ManagerRole,
    can_manage_inventory: bool,
    can_manage_stocktaking: bool,
    can_view_reports: bool,
    can_admin: bool,
    status: RecordStatus,
    memo: Option<String>,
    assigned_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ManagerRow> for Manager {
    type Error = RepositoryError;

    fn try_from(row: ManagerRow) -> Result<Self, Self::Error> {
        let account_id = AccountId::parse(&row.account_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid account id in database: {e}"))
        })?;

        Ok(Self {
            id: ManagerId::new(row.id),
            account_id,
            account_email: row.account_email,
            factory_id: FactoryId::new(row.factory_id),
            factory_name: row.factory_name,
            role: row.role,
            permissions: PermissionSet {
                inventory: row.can_manage_inventory,
                stocktaking: row.can_manage_stocktaking,
                reports: row.can_view_reports,
                admin: row.can_admin,
            },
            status: row.status,
            memo: row.memo,
            assigned_at: row.assigned_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Validated input for a new assignment.
#[derive(Debug, Clone)]
pub struct NewManager<'a> {
    pub account_id: &'a AccountId,
    pub factory_id: FactoryId,
    pub role: ManagerRole,
    pub permissions: PermissionSet,
    pub memo: Option<&'a str>,
}

/// Repository for manager database operations.
pub struct ManagerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ManagerRepository<'a> {
    /// Create a new manager repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List assignments on factories within `scope`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        scope: &FactoryScope,
        filter: &ManagerFilter,
    ) -> Result<Vec<Manager>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(MANAGER_SELECT);
        qb.push(" WHERE TRUE");
        push_factory_filter(&mut qb, "m.factory_id", scope);
        if let Some(factory_id) = filter.factory_id {
            qb.push(" AND m.factory_id = ").push_bind(factory_id);
        }
        if !filter.include_deactivated {
            qb.push(" AND m.status = 'active'");
        }
        qb.push(" ORDER BY f.name, m.role, m.account_id");

        let rows = qb.build_query_as::<ManagerRow>().fetch_all(self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an assignment by id, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(&self, id: ManagerId) -> Result<Option<Manager>, RepositoryError> {
        let sql = format!("{MANAGER_SELECT} WHERE m.id = $1");
        let row = sqlx::query_as::<_, ManagerRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create an assignment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the account already has an
    /// assignment on the factory (active or not) or does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewManager<'_>) -> Result<Manager, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO stock.manager (
                account_id, factory_id, role,
                can_manage_inventory, can_manage_stocktaking, can_view_reports, can_admin,
                memo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(input.account_id.as_str())
        .bind(input.factory_id)
        .bind(input.role)
        .bind(input.permissions.inventory)
        .bind(input.permissions.stocktaking)
        .bind(input.permissions.reports)
        .bind(input.permissions.admin)
        .bind(input.memo)
        .fetch_one(self.pool)
        .await?;

        self.get(ManagerId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update an assignment. Absent fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the assignment doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ManagerId,
        input: &UpdateManagerInput,
    ) -> Result<Manager, RepositoryError> {
        let perms = input.permissions;
        let updated: Option<i32> = sqlx::query_scalar(
            r"
            UPDATE stock.manager
            SET
                role = COALESCE($2, role),
                can_manage_inventory = COALESCE($3, can_manage_inventory),
                can_manage_stocktaking = COALESCE($4, can_manage_stocktaking),
                can_view_reports = COALESCE($5, can_view_reports),
                can_admin = COALESCE($6, can_admin),
                memo = COALESCE($7, memo),
                status = COALESCE($8, status)
            WHERE id = $1
            RETURNING id
            ",
        )
        .bind(id)
        .bind(input.role)
        .bind(perms.map(|p| p.inventory))
        .bind(perms.map(|p| p.stocktaking))
        .bind(perms.map(|p| p.reports))
        .bind(perms.map(|p| p.admin))
        .bind(&input.memo)
        .bind(input.status)
        .fetch_optional(self.pool)
        .await?;

        let id = updated.ok_or(RepositoryError::NotFound)?;
        self.get(ManagerId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Set an assignment's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the assignment doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: ManagerId,
        status: RecordStatus,
    ) -> Result<Manager, RepositoryError> {
        self.update(
            id,
            &UpdateManagerInput {
                status: Some(status),
                ..UpdateManagerInput::default()
            },
        )
        .await
    }
}
