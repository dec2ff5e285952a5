//! Manager permission flags.

use serde::{Deserialize, Serialize};

/// A single capability a manager may hold over a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Register items and book stock movements.
    Inventory,
    /// Record physical counts.
    Stocktaking,
    /// View reports.
    Reports,
    /// Administer the factory.
    Admin,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inventory => write!(f, "inventory"),
            Self::Stocktaking => write!(f, "stocktaking"),
            Self::Reports => write!(f, "reports"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The permission flags granted on one manager assignment.
///
/// Missing keys deserialize as `false`, so `{}` grants nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PermissionSet {
    pub inventory: bool,
    pub stocktaking: bool,
    pub reports: bool,
    pub admin: bool,
}

impl PermissionSet {
    /// Every flag set.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            inventory: true,
            stocktaking: true,
            reports: true,
            admin: true,
        }
    }

    /// Whether the given flag is set.
    #[must_use]
    pub const fn contains(&self, permission: Permission) -> bool {
        match permission {
            Permission::Inventory => self.inventory,
            Permission::Stocktaking => self.stocktaking,
            Permission::Reports => self.reports,
            Permission::Admin => self.admin,
        }
    }
}
