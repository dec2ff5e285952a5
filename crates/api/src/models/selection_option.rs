//! Selection option models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_inventory_core::{OptionType, RecordStatus, SelectionOptionId};

/// A selectable master value (category, supplier or unit).
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOption {
    pub id: SelectionOptionId,
    pub option_type: OptionType,
    pub value: String,
    pub status: RecordStatus,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an option.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOptionInput {
    pub option_type: OptionType,
    pub value: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Filter for listing options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionFilter {
    pub option_type: Option<OptionType>,
}
