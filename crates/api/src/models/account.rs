//! Account and "who am I" models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_inventory_core::{AccountId, Actor, FactoryId, Grant, ManagerRole, PermissionSet};

/// An authenticated principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The caller identity passed into every service operation.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor {
            account_id: self.id.clone(),
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}

/// Input for creating an account from the CLI.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    pub id: AccountId,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// A factory the account holds an active assignment on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedFactory {
    pub factory_id: FactoryId,
    pub factory_name: String,
    pub role: ManagerRole,
    pub permissions: PermissionSet,
}

impl ManagedFactory {
    /// The scope entry this assignment contributes.
    #[must_use]
    pub const fn grant(&self) -> (FactoryId, Grant) {
        (
            self.factory_id,
            Grant {
                role: self.role,
                permissions: self.permissions,
            },
        )
    }
}

/// Response body of `GET /me`.
#[derive(Debug, Clone, Serialize)]
pub struct Me {
    pub account: Account,
    /// Superusers see every factory regardless of assignments.
    pub unrestricted: bool,
    pub managed_factories: Vec<ManagedFactory>,
}
