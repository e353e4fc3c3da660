//! Application layer - Use cases and orchestration
//!
//! Contains the port definitions for the external collaborators (catalogue,
//! geocoding providers) and the services that compose them with the pure
//! domain computations: proximity ranking, the geo facade used by the HTTP
//! layer, and the multi-source search aggregator.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
