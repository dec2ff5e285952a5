//! Factory access scope.
//!
//! An account sees a factory when it holds an active manager assignment
//! there; superusers see every factory. [`FactoryScope`] is the single
//! predicate every read filter and write check goes through.
//!
//! Rejections distinguish "outside the scope" from "inside but lacking a
//! permission": the former must be reported as not-found so that existence
//! of other tenants' data does not leak.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AccountId, FactoryId, ManagerRole, Permission, PermissionSet};

/// The authenticated caller of a core operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub account_id: AccountId,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Actor {
    /// Whether the actor may maintain global master data (selection options).
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Access rejections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The factory is outside the actor's scope.
    #[error("factory {0} not found")]
    OutOfScope(FactoryId),
    /// The actor manages the factory but lacks a permission flag.
    #[error("missing {permission} permission on factory {factory_id}")]
    MissingPermission {
        factory_id: FactoryId,
        permission: Permission,
    },
    /// The operation needs the primary role on the factory (or superuser).
    #[error("primary manager role required on factory {0}")]
    PrimaryRoleRequired(FactoryId),
    /// The operation is reserved to superusers.
    #[error("superuser required")]
    SuperuserRequired,
    /// The operation is reserved to staff or superusers.
    #[error("staff or superuser required")]
    OperatorRequired,
}

/// What one active manager assignment grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub role: ManagerRole,
    pub permissions: PermissionSet,
}

impl Grant {
    /// Primary managers hold every permission; other roles only their flags.
    #[must_use]
    pub const fn allows(&self, permission: Permission) -> bool {
        matches!(self.role, ManagerRole::Primary) || self.permissions.contains(permission)
    }
}

/// The set of factories an actor may read, with the grant held on each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryScope {
    /// Superuser: every factory, every permission.
    Unrestricted,
    /// Factories with an active manager assignment.
    Managed(BTreeMap<FactoryId, Grant>),
}

impl FactoryScope {
    /// Build the scope for an actor from their active assignments.
    ///
    /// Grants are ignored for superusers.
    #[must_use]
    pub fn resolve<I>(actor: &Actor, active_grants: I) -> Self
    where
        I: IntoIterator<Item = (FactoryId, Grant)>,
    {
        if actor.is_superuser {
            Self::Unrestricted
        } else {
            Self::Managed(active_grants.into_iter().collect())
        }
    }

    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Whether reads on the factory are allowed.
    #[must_use]
    pub fn contains(&self, factory_id: FactoryId) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Managed(grants) => grants.contains_key(&factory_id),
        }
    }

    /// Role held on the factory. `None` for superusers without an assignment
    /// and for factories outside the scope.
    #[must_use]
    pub fn role_of(&self, factory_id: FactoryId) -> Option<ManagerRole> {
        self.grant(factory_id).map(|g| g.role)
    }

    #[must_use]
    pub fn grant(&self, factory_id: FactoryId) -> Option<&Grant> {
        match self {
            Self::Unrestricted => None,
            Self::Managed(grants) => grants.get(&factory_id),
        }
    }

    /// Factory ids to filter reads by; `None` means no filter.
    #[must_use]
    pub fn factory_ids(&self) -> Option<Vec<FactoryId>> {
        match self {
            Self::Unrestricted => None,
            Self::Managed(grants) => Some(grants.keys().copied().collect()),
        }
    }

    /// Reject factories outside the scope.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::OutOfScope`].
    pub fn ensure_visible(&self, factory_id: FactoryId) -> Result<(), AccessError> {
        if self.contains(factory_id) {
            Ok(())
        } else {
            Err(AccessError::OutOfScope(factory_id))
        }
    }

    /// Require a permission flag on a factory.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::OutOfScope`] if the factory is not visible and
    /// [`AccessError::MissingPermission`] if the grant lacks the flag.
    pub fn ensure_permission(
        &self,
        factory_id: FactoryId,
        permission: Permission,
    ) -> Result<(), AccessError> {
        match self {
            Self::Unrestricted => Ok(()),
            Self::Managed(grants) => match grants.get(&factory_id) {
                None => Err(AccessError::OutOfScope(factory_id)),
                Some(grant) if grant.allows(permission) => Ok(()),
                Some(_) => Err(AccessError::MissingPermission {
                    factory_id,
                    permission,
                }),
            },
        }
    }

    /// Require the primary role on a factory (superusers pass).
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::OutOfScope`] if the factory is not visible and
    /// [`AccessError::PrimaryRoleRequired`] for other roles.
    pub fn ensure_primary(&self, factory_id: FactoryId) -> Result<(), AccessError> {
        match self {
            Self::Unrestricted => Ok(()),
            Self::Managed(grants) => match grants.get(&factory_id) {
                None => Err(AccessError::OutOfScope(factory_id)),
                Some(grant) if grant.role == ManagerRole::Primary => Ok(()),
                Some(_) => Err(AccessError::PrimaryRoleRequired(factory_id)),
            },
        }
    }

    /// Require superuser.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::SuperuserRequired`].
    pub const fn ensure_superuser(&self) -> Result<(), AccessError> {
        if self.is_unrestricted() {
            Ok(())
        } else {
            Err(AccessError::SuperuserRequired)
        }
    }
}
