//! Geocoding provider clients for the climbing geo engine
//!
//! Three HTTP clients behind two small traits:
//!
//! - [`SwisstopoClient`]: swisstopo GeoAdmin address search and building
//!   register reverse lookup ([`GeocodeProvider::Swiss`](domain::GeocodeProvider))
//! - [`NominatimClient`]: OpenStreetMap Nominatim, the generic fallback
//! - [`OverpassClient`]: named points of interest via the Overpass API
//!
//! The clients only translate between the wire formats and the domain types.
//! Provider selection, fallback and caching live in the infrastructure
//! adapter that implements the application's `GeocodingPort`.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{GeocodingConfig, GeocodingProvider, SwisstopoClient};
//!
//! let client = SwisstopoClient::new(&GeocodingConfig::default())?;
//! let results = client.geocode("Bundesplatz 3, Bern").await?;
//! ```

mod config;
mod error;
mod http;
mod models;
mod nominatim;
mod overpass;
mod provider;
mod swisstopo;

pub use config::GeocodingConfig;
pub use error::GeocodingError;
pub use nominatim::NominatimClient;
pub use overpass::OverpassClient;
pub use provider::{GeocodingProvider, PoiProvider};
pub use swisstopo::SwisstopoClient;
