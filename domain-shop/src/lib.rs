//! Domain Shop HTTP API
//!
//! Routes, handlers and shared state for the domain-shop server. The binary
//! only loads settings and serves the router built here.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
