//! Factory models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_inventory_core::{FactoryId, FactoryStatus};

/// A factory (tenant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factory {
    pub id: FactoryId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub status: FactoryStatus,
    pub capacity: i32,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A factory with its number of active managers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorySummary {
    #[serde(flatten)]
    pub factory: Factory,
    pub active_manager_count: i64,
}

/// Input for creating a factory.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFactoryInput {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: FactoryStatus,
    #[serde(default)]
    pub capacity: i32,
    pub memo: Option<String>,
}

/// Partial update of a factory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFactoryInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: Option<FactoryStatus>,
    pub capacity: Option<i32>,
    pub memo: Option<String>,
}
