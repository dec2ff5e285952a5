//! Domain models for the inventory API.

pub mod account;
pub mod factory;
pub mod inventory;
pub mod manager;
pub mod selection_option;
pub mod stock_movement;
pub mod stocktaking;
pub mod storage_area;

pub use account::{Account, CreateAccountInput, ManagedFactory, Me};
pub use factory::{CreateFactoryInput, Factory, FactorySummary, UpdateFactoryInput};
pub use inventory::{
    CreateInventoryInput, Inventory, InventoryFilter, InventoryView, LocationInput,
    UpdateInventoryInput,
};
pub use manager::{AssignManagerInput, Manager, ManagerFilter, UpdateManagerInput};
pub use selection_option::{CreateOptionInput, OptionFilter, SelectionOption};
pub use stock_movement::{CreateMovementInput, MovementFilter, MovementReceipt, StockMovement};
pub use stocktaking::{RecordCountInput, Stocktaking, StocktakingFilter};
pub use storage_area::{
    Coordinate, CreateStorageAreaInput, StorageArea, StorageAreaDetail, StorageAreaFilter,
    UpdateStorageAreaInput,
};
