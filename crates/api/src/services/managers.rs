//! Manager assignments.
//!
//! Assigning, changing and deactivating managers needs the primary role on
//! the factory, or superuser.

use sqlx::PgPool;
use tracing::{info, instrument};

use factory_inventory_core::{AccountId, Actor, ManagerId, RecordStatus};

use super::{AccessService, ServiceError, non_blank};
use crate::db::ManagerRepository;
use crate::db::managers::NewManager;
use crate::models::{AssignManagerInput, Manager, ManagerFilter, UpdateManagerInput};

/// Manager assignment operations.
pub struct ManagerService<'a> {
    access: AccessService<'a>,
    managers: ManagerRepository<'a>,
}

impl<'a> ManagerService<'a> {
    /// Create a new manager service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            access: AccessService::new(pool),
            managers: ManagerRepository::new(pool),
        }
    }

    /// Assignments on factories in the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on storage failure.
    #[instrument(skip(self, filter), fields(account_id = %actor.account_id))]
    pub async fn list(
        &self,
        actor: &Actor,
        filter: &ManagerFilter,
    ) -> Result<Vec<Manager>, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        Ok(self.managers.list(&scope, filter).await?)
    }

    /// One assignment on a factory in the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if it doesn't exist or is out of scope.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn get(&self, actor: &Actor, id: ManagerId) -> Result<Manager, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        let manager = self.find(id).await?;
        scope
            .ensure_visible(manager.factory_id)
            .map_err(|_| manager_not_found(id))?;
        Ok(manager)
    }

    /// Assign an account to a factory.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a malformed or unknown account
    /// and for a duplicate (account, factory) pair.
    #[instrument(skip(self, input), fields(account_id = %actor.account_id, factory_id = %input.factory_id))]
    pub async fn assign(
        &self,
        actor: &Actor,
        input: &AssignManagerInput,
    ) -> Result<Manager, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        scope.ensure_primary(input.factory_id)?;
        let account_id = AccountId::parse(input.account_id.trim())?;

        let manager = self
            .managers
            .create(&NewManager {
                account_id: &account_id,
                factory_id: input.factory_id,
                role: input.role,
                permissions: input.permissions,
                memo: non_blank(input.memo.as_deref()),
            })
            .await?;

        info!(
            manager_id = %manager.id,
            factory_id = %manager.factory_id,
            manager_account_id = %manager.account_id,
            role = %manager.role,
            "manager assigned"
        );
        Ok(manager)
    }

    /// Change role, permissions, memo or status of an assignment.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if it doesn't exist or is out of
    /// scope and `ServiceError::PermissionDenied` without the primary role.
    #[instrument(skip(self, input), fields(account_id = %actor.account_id))]
    pub async fn update(
        &self,
        actor: &Actor,
        id: ManagerId,
        input: &UpdateManagerInput,
    ) -> Result<Manager, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        let current = self.find(id).await?;
        scope.ensure_primary(current.factory_id).map_err(|e| {
            if scope.contains(current.factory_id) {
                e.into()
            } else {
                manager_not_found(id)
            }
        })?;

        let manager = self.managers.update(id, input).await?;
        info!(
            manager_id = %manager.id,
            factory_id = %manager.factory_id,
            status = ?manager.status,
            "manager updated"
        );
        Ok(manager)
    }

    /// Deactivate an assignment. Deactivating twice is not an error.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`].
    pub async fn deactivate(&self, actor: &Actor, id: ManagerId) -> Result<Manager, ServiceError> {
        self.update(
            actor,
            id,
            &UpdateManagerInput {
                status: Some(RecordStatus::Deactivated),
                ..UpdateManagerInput::default()
            },
        )
        .await
    }

    async fn find(&self, id: ManagerId) -> Result<Manager, ServiceError> {
        self.managers
            .get(id)
            .await?
            .ok_or_else(|| manager_not_found(id))
    }
}

fn manager_not_found(id: ManagerId) -> ServiceError {
    ServiceError::not_found(format!("manager {id}"))
}
