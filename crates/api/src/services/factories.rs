//! Factory administration.

use sqlx::PgPool;
use tracing::{info, instrument};

use factory_inventory_core::{Actor, FactoryId};

use super::{AccessService, ServiceError, required};
use crate::db::{FactoryRepository, RepositoryError};
use crate::models::{CreateFactoryInput, Factory, FactorySummary, UpdateFactoryInput};

/// Factory operations.
pub struct FactoryService<'a> {
    access: AccessService<'a>,
    factories: FactoryRepository<'a>,
}

impl<'a> FactoryService<'a> {
    /// Create a new factory service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            access: AccessService::new(pool),
            factories: FactoryRepository::new(pool),
        }
    }

    /// Factories in the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on storage failure.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn list(&self, actor: &Actor) -> Result<Vec<FactorySummary>, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        Ok(self.factories.list(&scope).await?)
    }

    /// One factory in the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if it doesn't exist or is out of scope.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn get(&self, actor: &Actor, id: FactoryId) -> Result<FactorySummary, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        scope.ensure_visible(id)?;
        self.factories
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("factory {id}")))
    }

    /// Create a factory. Superuser only.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::PermissionDenied` for non-superusers and
    /// `ServiceError::Validation` for a blank name or negative capacity.
    #[instrument(skip(self, input), fields(account_id = %actor.account_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: &CreateFactoryInput,
    ) -> Result<Factory, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        scope.ensure_superuser()?;
        required("name", &input.name)?;
        validate_capacity(Some(input.capacity))?;

        let factory = self.factories.create(input).await?;
        info!(factory_id = %factory.id, "factory created");
        Ok(factory)
    }

    /// Update a factory. Superuser or primary manager of it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if out of scope,
    /// `ServiceError::PermissionDenied` for non-primary managers and
    /// `ServiceError::Validation` for invalid fields.
    #[instrument(skip(self, input), fields(account_id = %actor.account_id))]
    pub async fn update(
        &self,
        actor: &Actor,
        id: FactoryId,
        input: &UpdateFactoryInput,
    ) -> Result<Factory, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        scope.ensure_primary(id)?;
        if let Some(name) = input.name.as_deref() {
            required("name", name)?;
        }
        validate_capacity(input.capacity)?;

        let factory = self.factories.update(id, input).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::not_found(format!("factory {id}")),
            other => other.into(),
        })?;
        info!(factory_id = %factory.id, "factory updated");
        Ok(factory)
    }
}

fn validate_capacity(capacity: Option<i32>) -> Result<(), ServiceError> {
    match capacity {
        Some(c) if c < 0 => Err(ServiceError::Validation(format!(
            "capacity cannot be negative (got {c})"
        ))),
        _ => Ok(()),
    }
}
