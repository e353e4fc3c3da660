//! Domain layer for the climbing-site geo engine
//!
//! Contains the geographic value objects, the catalogue entities as seen by
//! the engine, and the pure coordinate computations (Swiss envelope check,
//! LV95 projection, great-circle distance). Nothing in this crate performs I/O.

pub mod entities;
pub mod errors;
pub mod geo;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
