use routing::DirectionsError;
use shared::{AddressQuery, Coordinate, Route, RouteRequest, parse_lat_lon};

use crate::error::ViewerError;

pub const LOCATION_ZOOM: f64 = 15.0;
pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 19.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Option<Coordinate>,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: None,
            zoom: MIN_ZOOM,
        }
    }
}

impl Camera {
    pub fn focused_on(center: Coordinate, zoom: f64) -> Self {
        Self {
            center: Some(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddressDialog {
    pub draft: String,
    /// A geocode request for `draft` is in flight.
    pub resolving: bool,
}

/// Everything the screen shows. Replaced wholesale by [`update`], never mutated in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub current_location: Option<Coordinate>,
    pub home: Option<Coordinate>,
    pub route: Option<Route>,
    pub loading: bool,
    pub dialog: Option<AddressDialog>,
    pub has_location_permission: bool,
    pub error: Option<ViewerError>,
    pub camera: Camera,
    pub route_generation: u64,
    pub geocode_generation: u64,
}

impl ViewState {
    pub fn new(has_location_permission: bool) -> Self {
        Self {
            has_location_permission,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    LocateRequested,
    PermissionResolved(bool),
    LocationResolved(Result<Option<Coordinate>, String>),
    AddressDialogOpened,
    AddressDraftChanged(String),
    AddressDialogDismissed,
    AddressSubmitted,
    GeocodeResolved {
        generation: u64,
        result: Option<Coordinate>,
    },
    /// A home address in its `"lat,lon"` text form.
    HomeAddressImported(String),
    RouteRequested,
    RouteResolved {
        generation: u64,
        result: Result<Route, DirectionsError>,
    },
    ErrorDismissed,
}

/// Side effects requested by [`update`]; the session runs them off the state owner.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RequestPermission,
    FetchLocation,
    Geocode { generation: u64, query: String },
    FetchRoute { generation: u64, request: RouteRequest },
}

pub fn update(state: &ViewState, msg: Msg) -> (ViewState, Option<Command>) {
    let mut next = state.clone();
    let command = match msg {
        Msg::LocateRequested => {
            if next.has_location_permission {
                Some(Command::FetchLocation)
            } else {
                Some(Command::RequestPermission)
            }
        }
        Msg::PermissionResolved(granted) => {
            next.has_location_permission = granted;
            if granted {
                Some(Command::FetchLocation)
            } else {
                next.error = Some(ViewerError::PermissionDenied);
                None
            }
        }
        Msg::LocationResolved(result) => {
            match result {
                Ok(Some(location)) => {
                    next.current_location = Some(location);
                    next.camera = Camera::focused_on(location, LOCATION_ZOOM);
                }
                Ok(None) => {
                    next.error = Some(ViewerError::LocationUnavailable(
                        "no location fix available".into(),
                    ));
                }
                Err(reason) => next.error = Some(ViewerError::LocationUnavailable(reason)),
            }
            None
        }
        Msg::AddressDialogOpened => {
            next.dialog = Some(AddressDialog {
                draft: state.home.map(|home| home.to_string()).unwrap_or_default(),
                resolving: false,
            });
            None
        }
        Msg::AddressDraftChanged(text) => {
            if let Some(dialog) = next.dialog.as_mut() {
                dialog.draft = text;
            }
            None
        }
        Msg::AddressDialogDismissed => {
            next.dialog = None;
            // whatever the geocoder answers now belongs to a closed dialog
            next.geocode_generation += 1;
            None
        }
        Msg::AddressSubmitted => submit_address(&mut next),
        Msg::GeocodeResolved { generation, result } => {
            if generation != state.geocode_generation {
                tracing::debug!(
                    "dropping stale geocode result {generation} (current {})",
                    state.geocode_generation
                );
                return (next, None);
            }
            next.dialog = None;
            match result {
                Some(home) => set_home(&mut next, home),
                None => next.error = Some(ViewerError::GeocodeNotFound),
            }
            None
        }
        Msg::HomeAddressImported(raw) => {
            match parse_lat_lon(&raw) {
                Ok(home) => set_home(&mut next, home),
                Err(err) => next.error = Some(err.into()),
            }
            None
        }
        Msg::RouteRequested => request_route(&mut next),
        Msg::RouteResolved { generation, result } => {
            if generation != state.route_generation {
                tracing::debug!(
                    "dropping stale route result {generation} (current {})",
                    state.route_generation
                );
                return (next, None);
            }
            next.loading = false;
            match result {
                Ok(route) => next.route = Some(route),
                Err(err) => next.error = Some(err.into()),
            }
            None
        }
        Msg::ErrorDismissed => {
            next.error = None;
            None
        }
    };
    (next, command)
}

fn submit_address(next: &mut ViewState) -> Option<Command> {
    let draft = next.dialog.as_ref()?.draft.clone();

    match AddressQuery::classify(&draft) {
        Ok(AddressQuery::Literal(home)) => {
            set_home(next, home);
            next.dialog = None;
            None
        }
        Ok(AddressQuery::FreeText(query)) if query.is_empty() => {
            next.error = Some(ViewerError::GeocodeNotFound);
            next.dialog = None;
            None
        }
        Ok(AddressQuery::FreeText(query)) => {
            next.geocode_generation += 1;
            if let Some(dialog) = next.dialog.as_mut() {
                dialog.resolving = true;
            }
            Some(Command::Geocode {
                generation: next.geocode_generation,
                query,
            })
        }
        Err(err) => {
            next.error = Some(err.into());
            None
        }
    }
}

fn set_home(next: &mut ViewState, home: Coordinate) {
    next.home = Some(home);
    if next.error.as_ref().is_some_and(ViewerError::is_address_error) {
        next.error = None;
    }
}

fn request_route(next: &mut ViewState) -> Option<Command> {
    let (Some(origin), Some(destination)) = (next.current_location, next.home) else {
        next.error = Some(ViewerError::MissingPrerequisite);
        return None;
    };

    next.route_generation += 1;
    next.loading = true;
    next.error = None;
    Some(Command::FetchRoute {
        generation: next.route_generation,
        request: RouteRequest::new(origin, destination),
    })
}
