use routing::DirectionsError;
use shared::AddressError;
use thiserror::Error;

/// Everything the viewer can show in its error banner.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    #[error("location permission is required to use this feature")]
    PermissionDenied,
    #[error("could not get the current location: {0}")]
    LocationUnavailable(String),
    #[error("address not found")]
    GeocodeNotFound,
    #[error("incorrect address format, use latitude,longitude")]
    InvalidAddressFormat,
    #[error("invalid coordinates, for example 19.432608,-99.133209")]
    InvalidCoordinateValue,
    #[error("invalid API key")]
    RouteApiUnauthorized,
    #[error("invalid request data, check the coordinates")]
    RouteApiBadRequest,
    #[error("no route found between the points")]
    RouteApiNotFound,
    #[error("failed to fetch route: {0}")]
    RouteApiTransport(String),
    #[error("get your location and set a home address first")]
    MissingPrerequisite,
}

impl ViewerError {
    /// Raised while entering a home address; stale once a home is set.
    pub fn is_address_error(&self) -> bool {
        matches!(
            self,
            Self::GeocodeNotFound | Self::InvalidAddressFormat | Self::InvalidCoordinateValue
        )
    }
}

impl From<DirectionsError> for ViewerError {
    fn from(err: DirectionsError) -> Self {
        match err {
            DirectionsError::InvalidRequest => Self::RouteApiBadRequest,
            DirectionsError::InvalidApiKey => Self::RouteApiUnauthorized,
            DirectionsError::NotFound => Self::RouteApiNotFound,
            DirectionsError::Transport(msg) | DirectionsError::InvalidResponse(msg) => {
                Self::RouteApiTransport(msg)
            }
        }
    }
}

impl From<AddressError> for ViewerError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::InvalidFormat { .. } => Self::InvalidAddressFormat,
            AddressError::NotANumber(_) | AddressError::OutOfRange(_) => {
                Self::InvalidCoordinateValue
            }
        }
    }
}
