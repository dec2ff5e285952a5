//! Status and classification enums for inventory entities.
//!
//! Each enum maps to a `PostgreSQL` enum type in the `stock` schema when the
//! `postgres` feature is enabled.

use serde::{Deserialize, Serialize};

/// Operating status of a factory.
///
/// Inactive factories are soft-disabled; their children are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "stock.factory_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum FactoryStatus {
    #[default]
    Active,
    Inactive,
}

/// Role of a manager within one factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "stock.manager_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ManagerRole {
    /// Lead manager. Holds every permission and administers other managers.
    #[default]
    Primary,
    /// Deputy manager, limited to the granted permission flags.
    Assistant,
    /// Oversight role, limited to the granted permission flags.
    Supervisor,
}

impl std::fmt::Display for ManagerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Assistant => write!(f, "assistant"),
            Self::Supervisor => write!(f, "supervisor"),
        }
    }
}

impl std::str::FromStr for ManagerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "assistant" => Ok(Self::Assistant),
            "supervisor" => Ok(Self::Supervisor),
            _ => Err(format!("invalid manager role: {s}")),
        }
    }
}

/// Logical lifecycle of soft-deletable records (managers, selection options).
///
/// Read paths filter on this explicitly; rows are never hard-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "stock.record_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Deactivated,
}

impl RecordStatus {
    /// Whether the record currently takes effect.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Direction of a stock ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "stock.movement_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods received; increases stock.
    In,
    /// Goods issued; decreases stock.
    Out,
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Out => write!(f, "out"),
        }
    }
}

/// Progress of a stocktaking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "stock.stocktaking_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum StocktakingStatus {
    InProgress,
    #[default]
    Completed,
}

/// Kind of selectable master value offered to inventory forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "stock.option_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Category,
    Supplier,
    Unit,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Supplier => write!(f, "supplier"),
            Self::Unit => write!(f, "unit"),
        }
    }
}
