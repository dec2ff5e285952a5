//! Business logic services.
//!
//! Every operation takes the calling [`Actor`](factory_inventory_core::Actor)
//! explicitly and resolves its factory scope from the database.
//!
//! # Services
//!
//! - `access` - Factory scope resolution and the "who am I" view
//! - `factories` - Factory administration
//! - `managers` - Manager assignments
//! - `storage` - Storage areas, coordinate grids and occupancy
//! - `inventory` - Item registration and descriptive updates
//! - `ledger` - Stock movements
//! - `stocktaking` - Physical count records
//! - `selection_options` - Category, supplier and unit master values

pub mod access;
pub mod factories;
pub mod inventory;
pub mod ledger;
pub mod managers;
pub mod selection_options;
pub mod stocktaking;
pub mod storage;

use thiserror::Error;

use factory_inventory_core::{
    AccessError, AccountIdError, AreaNameError, GridError, LedgerError, StocktakingError,
    UnitPriceError,
};

use crate::db::RepositoryError;

pub use access::AccessService;
pub use factories::FactoryService;
pub use inventory::InventoryService;
pub use ledger::LedgerService;
pub use managers::ManagerService;
pub use selection_options::SelectionOptionService;
pub use stocktaking::StocktakingService;
pub use storage::StorageService;

/// Errors returned by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input or a violated uniqueness rule. Nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The actor lacks the permission the operation needs.
    #[error("{0}")]
    PermissionDenied(String),

    /// The entity does not exist or lies outside the actor's scope.
    #[error("{0} not found")]
    NotFound(String),

    /// An outbound movement exceeds the stock on hand.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    /// Lost a race with a concurrent update; the caller may retry.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected storage failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub(crate) fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(message) => Self::Validation(message),
            RepositoryError::Contention => Self::Conflict(e.to_string()),
            RepositoryError::NotFound => Self::NotFound("resource".to_owned()),
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                Self::Repository(e)
            }
        }
    }
}

impl From<AccessError> for ServiceError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::OutOfScope(factory_id) => Self::not_found(format!("factory {factory_id}")),
            AccessError::MissingPermission { .. }
            | AccessError::PrimaryRoleRequired(_)
            | AccessError::SuperuserRequired
            | AccessError::OperatorRequired => Self::PermissionDenied(e.to_string()),
        }
    }
}

impl From<LedgerError> for ServiceError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientStock {
                available,
                requested,
            } => Self::InsufficientStock {
                available,
                requested,
            },
            LedgerError::NonPositiveQuantity(_) | LedgerError::Overflow => {
                Self::Validation(e.to_string())
            }
        }
    }
}

macro_rules! validation_from {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for ServiceError {
                fn from(e: $err) -> Self {
                    Self::Validation(e.to_string())
                }
            }
        )+
    };
}

validation_from!(
    GridError,
    AreaNameError,
    StocktakingError,
    UnitPriceError,
    AccountIdError,
);

/// Trim optional text, treating blank as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Require non-blank text.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use factory_inventory_core::{FactoryId, Permission};

    use super::*;

    #[test]
    fn test_out_of_scope_is_not_found() {
        let err = ServiceError::from(AccessError::OutOfScope(FactoryId::new(9)));
        assert!(matches!(err, ServiceError::NotFound(ref what) if what == "factory 9"));
        assert_eq!(err.to_string(), "factory 9 not found");
    }

    #[test]
    fn test_missing_permission_is_denied() {
        let err = ServiceError::from(AccessError::MissingPermission {
            factory_id: FactoryId::new(1),
            permission: Permission::Inventory,
        });
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
    }

    #[test]
    fn test_repository_mapping() {
        assert!(matches!(
            ServiceError::from(RepositoryError::Conflict("item code already exists".into())),
            ServiceError::Validation(ref m) if m == "item code already exists"
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Contention),
            ServiceError::Conflict(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::DataCorruption("x".into())),
            ServiceError::Repository(_)
        ));
    }

    #[test]
    fn test_insufficient_stock_carries_figures() {
        let err = ServiceError::from(LedgerError::InsufficientStock {
            available: 100,
            requested: 150,
        });
        assert!(matches!(
            err,
            ServiceError::InsufficientStock {
                available: 100,
                requested: 150
            }
        ));
    }

    #[test]
    fn test_required_and_non_blank() {
        assert!(required("name", "  ").is_err());
        assert_eq!(required("name", " Plant 1 ").ok(), Some("Plant 1"));
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" x ")), Some("x"));
    }
}
