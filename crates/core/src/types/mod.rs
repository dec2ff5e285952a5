//! Domain value types.
//!
//! Type-safe ids, validated names and prices, and the enums stored as
//! `PostgreSQL` enum types.

pub mod area_name;
pub mod id;
pub mod permission;
pub mod price;
pub mod status;

pub use area_name::{AreaName, AreaNameError};
pub use id::*;
pub use permission::{Permission, PermissionSet};
pub use price::{UnitPrice, UnitPriceError};
pub use status::*;
