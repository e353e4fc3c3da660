//! HTTP presentation layer for the climbing geo engine
//!
//! Exposes the `/geo/*` query surface plus health endpoints over axum.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use routes::create_router;
pub use state::AppState;
