pub mod config;
pub mod directions;
pub mod error;
pub mod geocode;

pub use config::ProviderConfig;
pub use directions::{DirectionsClient, DirectionsProvider};
pub use error::{ConfigError, DirectionsError, GeocodeError};
pub use geocode::{Geocoder, OrsGeocoder};
