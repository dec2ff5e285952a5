//! Factory access scope resolution.

use sqlx::PgPool;
use tracing::instrument;

use factory_inventory_core::{Actor, FactoryId, FactoryScope, ManagerRole};

use super::ServiceError;
use crate::db::scope;
use crate::models::{Account, Me};

/// Resolves which factories an actor may see and what it may do there.
pub struct AccessService<'a> {
    pool: &'a PgPool,
}

impl<'a> AccessService<'a> {
    /// Create a new access service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The actor's factory scope. Superusers skip the lookup.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the assignments cannot be read.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn resolve_scope(&self, actor: &Actor) -> Result<FactoryScope, ServiceError> {
        if actor.is_superuser {
            return Ok(FactoryScope::Unrestricted);
        }
        let managed = scope::managed_factories(self.pool, &actor.account_id).await?;
        Ok(FactoryScope::resolve(
            actor,
            managed.iter().map(|m| m.grant()),
        ))
    }

    /// Whether the actor holds an active assignment on the factory.
    ///
    /// Superusers without an assignment are not managers; they bypass scope
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the assignments cannot be read.
    pub async fn is_factory_manager(
        &self,
        actor: &Actor,
        factory_id: FactoryId,
    ) -> Result<bool, ServiceError> {
        Ok(self.role_of(actor, factory_id).await?.is_some())
    }

    /// Role of the actor's active assignment on the factory.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the assignments cannot be read.
    pub async fn role_of(
        &self,
        actor: &Actor,
        factory_id: FactoryId,
    ) -> Result<Option<ManagerRole>, ServiceError> {
        let managed = scope::managed_factories(self.pool, &actor.account_id).await?;
        Ok(managed
            .into_iter()
            .find(|m| m.factory_id == factory_id)
            .map(|m| m.role))
    }

    /// The account together with every factory it manages.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the assignments cannot be read.
    #[instrument(skip(self, account), fields(account_id = %account.id))]
    pub async fn me(&self, account: Account) -> Result<Me, ServiceError> {
        let managed_factories = scope::managed_factories(self.pool, &account.id).await?;
        Ok(Me {
            unrestricted: account.is_superuser,
            account,
            managed_factories,
        })
    }
}
