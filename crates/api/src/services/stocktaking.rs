//! Physical counts.
//!
//! A count records what the system believed and what was found. It never
//! adjusts stock; corrections go through the ledger.

use sqlx::PgPool;
use tracing::{info, instrument};

use factory_inventory_core::{Actor, Discrepancy, Permission};

use super::{AccessService, ServiceError, non_blank};
use crate::db::inventory as items;
use crate::db::stocktakings::{self, NewStocktaking};
use crate::db::{self, RepositoryError, StocktakingRepository};
use crate::models::{RecordCountInput, Stocktaking, StocktakingFilter};

/// Stocktaking operations.
pub struct StocktakingService<'a> {
    pool: &'a PgPool,
    access: AccessService<'a>,
    counts: StocktakingRepository<'a>,
}

impl<'a> StocktakingService<'a> {
    /// Create a new stocktaking service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            access: AccessService::new(pool),
            counts: StocktakingRepository::new(pool),
        }
    }

    /// Counts in the actor's scope, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on storage failure.
    #[instrument(skip(self, filter), fields(account_id = %actor.account_id))]
    pub async fn list(
        &self,
        actor: &Actor,
        filter: &StocktakingFilter,
    ) -> Result<Vec<Stocktaking>, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        Ok(self.counts.list(&scope, filter).await?)
    }

    /// Record a count. The difference is always computed here.
    ///
    /// Without `theoretical_stock` the item's stock at recording time is
    /// used, read under the item's row lock.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` for negative figures
    /// - `ServiceError::NotFound` if the item is missing or out of scope
    /// - `ServiceError::PermissionDenied` without stocktaking permission
    #[instrument(
        skip(self, input),
        fields(account_id = %actor.account_id, item_id = %input.inventory_id)
    )]
    pub async fn record_count(
        &self,
        actor: &Actor,
        input: &RecordCountInput,
    ) -> Result<Stocktaking, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;

        let mut tx = db::begin_locking(self.pool).await?;
        let item = items::lock_by_id(&mut tx, input.inventory_id)
            .await?
            .filter(|item| scope.contains(item.factory_id))
            .ok_or_else(|| ServiceError::not_found(format!("item {}", input.inventory_id)))?;
        scope.ensure_permission(item.factory_id, Permission::Stocktaking)?;

        let discrepancy = Discrepancy::between(
            input.theoretical_stock.unwrap_or(item.stock_quantity),
            input.actual_stock,
        )?;
        let count = stocktakings::insert(
            &mut tx,
            &NewStocktaking {
                inventory_id: item.id,
                discrepancy,
                account_id: &actor.account_id,
                status: input.status,
                memo: non_blank(input.memo.as_deref()),
            },
        )
        .await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            stocktaking_id = %count.id,
            factory_id = %count.factory_id,
            difference = count.difference,
            "stocktaking recorded"
        );
        Ok(count)
    }
}
