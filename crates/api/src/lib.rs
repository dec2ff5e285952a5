//! Factory inventory API library.
//!
//! Factories, their managers, storage areas with generated coordinate grids,
//! inventory items, the stock ledger and stocktaking counts, all scoped per
//! account to the factories it manages.
//!
//! The binary in `main.rs` only wires configuration, telemetry and the
//! listener around [`routes::routes`]; the CLI and integration tests use the
//! same repositories and services directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
