//! Pure geographic computations
//!
//! Envelope validation, LV95 projection and great-circle distance. These are
//! side-effect free and safe to call concurrently from any number of requests.

pub mod distance;
pub mod transform;
pub mod validator;

pub use distance::{estimate_travel, haversine_km};
pub use transform::{parse_swiss_grid, to_swiss_grid, to_wgs84};
pub use validator::{SWISS_ENVELOPE, ensure_within_switzerland, is_valid_swiss_coordinate};
