//! HTTP middleware and extractors.
//!
//! # Layer order (outermost first, see `main.rs`)
//!
//! 1. Trailing-slash normalization (wraps the router so it runs before routing)
//! 2. Sentry hub and HTTP transaction
//! 3. `TraceLayer` (request span with status and latency)
//! 4. [`request_id_middleware`]
//!
//! Authentication is an extractor, [`RequireAccount`], rather than a layer so
//! that the health checks stay open.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, RequireAccount};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
