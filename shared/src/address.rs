// The "lat,lon" text form is the only place user-typed numbers enter the system.

use std::str::FromStr;

use crate::{Coordinate, CoordinateError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddressError {
    #[error("expected \"latitude,longitude\" but found {parts} part(s)")]
    InvalidFormat { parts: usize },
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error(transparent)]
    OutOfRange(#[from] CoordinateError),
}

/// Parse a literal `"lat,lon"` string, trimming whitespace around each half.
pub fn parse_lat_lon(raw: &str) -> Result<Coordinate, AddressError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [lat, lon] = parts[..] else {
        return Err(AddressError::InvalidFormat { parts: parts.len() });
    };

    let number = |field: &str| {
        field
            .parse::<f64>()
            .map_err(|_| AddressError::NotANumber(field.to_string()))
    };

    Ok(Coordinate::new(number(lat)?, number(lon)?)?)
}

impl FromStr for Coordinate {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_lat_lon(s)
    }
}

/// What the user typed in the home-address field.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressQuery {
    /// Already a coordinate, no geocoding needed.
    Literal(Coordinate),
    /// Free text for the geocoder, trimmed.
    FreeText(String),
}

impl AddressQuery {
    /// A numerically well-formed pair that is off the globe is an error rather
    /// than something to hand to the geocoder.
    pub fn classify(text: &str) -> Result<Self, AddressError> {
        match parse_lat_lon(text) {
            Ok(coordinate) => Ok(Self::Literal(coordinate)),
            Err(err @ AddressError::OutOfRange(_)) => Err(err),
            Err(_) => Ok(Self::FreeText(text.trim().to_string())),
        }
    }
}
