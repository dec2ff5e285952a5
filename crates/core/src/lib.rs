//! Factory Inventory Core - domain types and inventory rules.
//!
//! Shared by the `api` server, the `cli` and the integration tests.
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. Callers load rows, ask these modules what the outcome
//! is, and persist it inside their own transaction.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, area names, prices, permissions and statuses
//! - [`grid`] - Coordinate generation and resize planning
//! - [`occupancy`] - Utilization figures for a storage area
//! - [`ledger`] - Stock movement arithmetic
//! - [`stocktaking`] - Count discrepancy
//! - [`scope`] - Factory visibility and permission checks
//! - [`location`] - Grid cell or legacy text placement

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod grid;
pub mod ledger;
pub mod location;
pub mod occupancy;
pub mod scope;
pub mod stocktaking;
pub mod types;

pub use grid::{Cell, GridError, GridSize, MAX_DIMENSION, ResizePlan};
pub use ledger::{LedgerError, MovementQuantity};
pub use location::{GridRef, StorageLocation};
pub use occupancy::Occupancy;
pub use scope::{AccessError, Actor, FactoryScope, Grant};
pub use stocktaking::{Discrepancy, DiscrepancyKind, StocktakingError};
pub use types::*;
