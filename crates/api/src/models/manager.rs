//! Manager assignment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_inventory_core::{
    AccountId, FactoryId, Grant, ManagerId, ManagerRole, PermissionSet, RecordStatus,
};

/// An account's assignment to a factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manager {
    pub id: ManagerId,
    pub account_id: AccountId,
    pub account_email: String,
    pub factory_id: FactoryId,
    pub factory_name: String,
    pub role: ManagerRole,
    pub permissions: PermissionSet,
    pub status: RecordStatus,
    pub memo: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Manager {
    /// The grant this assignment confers while active.
    #[must_use]
    pub const fn grant(&self) -> Grant {
        Grant {
            role: self.role,
            permissions: self.permissions,
        }
    }
}

/// Input for assigning an account to a factory.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignManagerInput {
    pub account_id: String,
    pub factory_id: FactoryId,
    #[serde(default)]
    pub role: ManagerRole,
    #[serde(default)]
    pub permissions: PermissionSet,
    pub memo: Option<String>,
}

/// Partial update of an assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateManagerInput {
    pub role: Option<ManagerRole>,
    pub permissions: Option<PermissionSet>,
    pub memo: Option<String>,
    pub status: Option<RecordStatus>,
}

/// Filter criteria for listing managers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManagerFilter {
    pub factory_id: Option<FactoryId>,
    #[serde(default)]
    pub include_deactivated: bool,
}
