//! Loading and applying the factory access scope.
//!
//! Every scoped list query appends [`push_factory_filter`]; single-row reads
//! check the loaded row's factory with `FactoryScope::ensure_visible`.

use sqlx::{PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{AccountId, FactoryId, FactoryScope, ManagerRole, PermissionSet};

use super::RepositoryError;
use crate::models::ManagedFactory;

#[derive(Debug, sqlx::FromRow)]
struct GrantRow {
    factory_id: i32,
    factory_name: String,
    role: ManagerRole,
    can_manage_inventory: bool,
    can_manage_stocktaking: bool,
    can_view_reports: bool,
    can_admin: bool,
}

impl From<GrantRow> for ManagedFactory {
    fn from(row: GrantRow) -> Self {
        Self {
            factory_id: FactoryId::new(row.factory_id),
            factory_name: row.factory_name,
            role: row.role,
            permissions: PermissionSet {
                inventory: row.can_manage_inventory,
                stocktaking: row.can_manage_stocktaking,
                reports: row.can_view_reports,
                admin: row.can_admin,
            },
        }
    }
}

/// Factories the account holds an active assignment on, by name.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn managed_factories(
    pool: &PgPool,
    account_id: &AccountId,
) -> Result<Vec<ManagedFactory>, RepositoryError> {
    let rows = sqlx::query_as::<_, GrantRow>(
        r"
        SELECT m.factory_id, f.name AS factory_name, m.role,
               m.can_manage_inventory, m.can_manage_stocktaking,
               m.can_view_reports, m.can_admin
        FROM stock.manager m
        JOIN stock.factory f ON f.id = m.factory_id
        WHERE m.account_id = $1 AND m.status = 'active'
        ORDER BY f.name, m.factory_id
        ",
    )
    .bind(account_id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Append `AND <column> = ANY(<scope>)` unless the scope is unrestricted.
///
/// `column` must be a trusted identifier, never user input.
pub fn push_factory_filter(qb: &mut QueryBuilder<'_, Postgres>, column: &str, scope: &FactoryScope) {
    if let Some(ids) = scope.factory_ids() {
        let ids: Vec<i32> = ids.into_iter().map(i32::from).collect();
        qb.push(" AND ").push(column).push(" = ANY(").push_bind(ids).push(")");
    }
}
