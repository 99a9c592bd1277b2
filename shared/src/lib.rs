pub mod address;

use serde::{Deserialize, Serialize};

pub use address::{AddressError, AddressQuery, parse_lat_lon};

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A validated point on Earth, stored in map order (latitude first).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Rejects non-finite values as well as anything outside the geographic range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Renders as `"lat,lon"`, the form accepted back by [`parse_lat_lon`].
impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", format_degrees(self.lat), format_degrees(self.lon))
    }
}

/// Shortest round-trip decimal form, keeping a `.0` suffix on integral values.
pub fn format_degrees(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

impl RouteRequest {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

/// Ordered polyline from origin to destination. Empty means "no route found".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    points: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Route {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0], pair[1]))
            .sum()
    }

    pub fn bounds(&self) -> Option<RouteBounds> {
        let first = self.points.first()?;
        let seed = RouteBounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(self.points.iter().fold(seed, |b, c| RouteBounds {
            min_lat: b.min_lat.min(c.lat),
            max_lat: b.max_lat.max(c.lat),
            min_lon: b.min_lon.min(c.lon),
            max_lon: b.max_lon.max(c.lon),
        }))
    }
}

impl FromIterator<Coordinate> for Route {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Haversine of an angle in radians.
fn hav(theta: f64) -> f64 {
    (theta / 2.0).sin().powi(2)
}

/// Great-circle distance on a spherical Earth.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (phi_a, phi_b) = (a.lat.to_radians(), b.lat.to_radians());
    let delta_lambda = (b.lon - a.lon).to_radians();

    let h = hav(phi_b - phi_a) + phi_a.cos() * phi_b.cos() * hav(delta_lambda);
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.1),
            Err(CoordinateError::LongitudeOutOfRange(-180.1))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinate_accepts_edges() {
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
        assert!(Coordinate::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn test_display_keeps_decimal_suffix() {
        assert_eq!(coord(19.0, -99.0).to_string(), "19.0,-99.0");
        assert_eq!(coord(19.432608, -99.133209).to_string(), "19.432608,-99.133209");
    }

    #[test]
    fn test_deserialize_validates_range() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 45.0, "lon": 5.0}"#).unwrap();
        assert_eq!(ok, coord(45.0, 5.0));

        let err = serde_json::from_str::<Coordinate>(r#"{"lat": 145.0, "lon": 5.0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_route_serializes_as_plain_list() {
        let route = Route::new(vec![coord(1.0, 2.0)]);
        let json = serde_json::to_string(&route).unwrap();
        assert_eq!(json, r#"[{"lat":1.0,"lon":2.0}]"#);
    }

    #[test]
    fn test_empty_route_has_no_bounds() {
        let route = Route::default();
        assert!(route.is_empty());
        assert_eq!(route.bounds(), None);
        assert_eq!(route.length_km(), 0.0);
    }

    #[test]
    fn test_route_bounds() {
        let route: Route = [coord(19.43, -99.13), coord(19.44, -99.14), coord(19.40, -99.10)]
            .into_iter()
            .collect();
        let bounds = route.bounds().unwrap();
        assert_eq!(bounds.min_lat, 19.40);
        assert_eq!(bounds.max_lat, 19.44);
        assert_eq!(bounds.min_lon, -99.14);
        assert_eq!(bounds.max_lon, -99.10);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Paris to London, roughly 343 km
        let dist = haversine_km(coord(48.8566, 2.3522), coord(51.5074, -0.1278));
        assert!((dist - 343.0).abs() < 5.0);
    }

    #[test]
    fn test_haversine_short_hop_and_antipodes() {
        // 0.001 degree of latitude is about 111 m
        let hop = haversine_km(coord(45.0, 4.0), coord(45.001, 4.0));
        assert!((hop - 0.1112).abs() < 1e-3);

        let half_circle = std::f64::consts::PI * EARTH_RADIUS_KM;
        let far = haversine_km(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!((far - half_circle).abs() < 1e-6);
        assert_eq!(haversine_km(coord(10.0, 10.0), coord(10.0, 10.0)), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| coord(lat, lon))
        }

        proptest! {
            #[test]
            fn prop_haversine_symmetric(a in valid_coord(), b in valid_coord()) {
                prop_assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
            }

            #[test]
            fn prop_haversine_bounded_by_half_circumference(a in valid_coord(), b in valid_coord()) {
                let max_distance = std::f64::consts::PI * EARTH_RADIUS_KM;
                prop_assert!(haversine_km(a, b) <= max_distance + 0.1);
            }

            #[test]
            fn prop_route_bounds_contain_every_point(
                points in prop::collection::vec(valid_coord(), 1..20)
            ) {
                let route = Route::new(points);
                let bounds = route.bounds().unwrap();
                for p in route.points() {
                    prop_assert!(p.lat() >= bounds.min_lat && p.lat() <= bounds.max_lat);
                    prop_assert!(p.lon() >= bounds.min_lon && p.lon() <= bounds.max_lon);
                }
            }
        }
    }
}
