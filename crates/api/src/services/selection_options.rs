//! Category, supplier and unit master values.

use sqlx::PgPool;
use tracing::{info, instrument};

use factory_inventory_core::{AccessError, Actor, RecordStatus, SelectionOptionId};

use super::{ServiceError, required};
use crate::db::{RepositoryError, SelectionOptionRepository};
use crate::models::{CreateOptionInput, OptionFilter, SelectionOption};

/// Selection option operations.
pub struct SelectionOptionService<'a> {
    options: SelectionOptionRepository<'a>,
}

impl<'a> SelectionOptionService<'a> {
    /// Create a new selection option service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            options: SelectionOptionRepository::new(pool),
        }
    }

    /// Active options. Open to every account.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on storage failure.
    pub async fn list(&self, filter: &OptionFilter) -> Result<Vec<SelectionOption>, ServiceError> {
        Ok(self.options.list(filter).await?)
    }

    /// Create an option. Staff or superuser.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::PermissionDenied` for other accounts and
    /// `ServiceError::Validation` for a blank or duplicate value.
    #[instrument(skip(self, input), fields(account_id = %actor.account_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: &CreateOptionInput,
    ) -> Result<SelectionOption, ServiceError> {
        ensure_operator(actor)?;
        required("value", &input.value)?;

        let option = self.options.create(input).await?;
        info!(option_id = %option.id, option_type = %option.option_type, "selection option created");
        Ok(option)
    }

    /// Deactivate an option. Staff or superuser.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::PermissionDenied` for other accounts and
    /// `ServiceError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn deactivate(
        &self,
        actor: &Actor,
        id: SelectionOptionId,
    ) -> Result<SelectionOption, ServiceError> {
        ensure_operator(actor)?;

        let option = self
            .options
            .set_status(id, RecordStatus::Deactivated)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::not_found(format!("selection option {id}")),
                other => other.into(),
            })?;
        info!(option_id = %option.id, "selection option deactivated");
        Ok(option)
    }
}

fn ensure_operator(actor: &Actor) -> Result<(), ServiceError> {
    if actor.is_operator() {
        Ok(())
    } else {
        Err(AccessError::OperatorRequired.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use factory_inventory_core::AccountId;

    use super::*;

    fn actor(is_staff: bool, is_superuser: bool) -> Actor {
        Actor {
            account_id: AccountId::parse("someone").unwrap(),
            is_staff,
            is_superuser,
        }
    }

    #[test]
    fn test_operators() {
        assert!(ensure_operator(&actor(true, false)).is_ok());
        assert!(ensure_operator(&actor(false, true)).is_ok());
        assert!(matches!(
            ensure_operator(&actor(false, false)),
            Err(ServiceError::PermissionDenied(_))
        ));
    }
}
