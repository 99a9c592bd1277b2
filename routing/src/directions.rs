use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{Coordinate, Route, RouteRequest, format_degrees};

use crate::{config::ProviderConfig, error::DirectionsError};

pub const DIRECTIONS_PATH: &str = "v2/directions/driving-car";

/// Seam between the viewer and whatever computes driving routes.
///
/// Implementations return an empty [`Route`] when the provider has no
/// feature for the pair, and reserve errors for request/transport problems.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(&self, request: RouteRequest) -> Result<Route, DirectionsError>;
}

/// Query string of a directions request. The provider wants `lon,lat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsQuery<'a> {
    api_key: &'a str,
    start: String,
    end: String,
}

impl<'a> DirectionsQuery<'a> {
    pub fn new(api_key: &'a str, start: Coordinate, end: Coordinate) -> Self {
        Self {
            api_key,
            start: lon_lat(start),
            end: lon_lat(end),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

pub fn lon_lat(coordinate: Coordinate) -> String {
    format!(
        "{},{}",
        format_degrees(coordinate.lon()),
        format_degrees(coordinate.lat())
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// `[lon, lat]` or `[lon, lat, elevation]` positions.
    pub coordinates: Vec<Vec<f64>>,
}

impl DirectionsResponse {
    /// Projects the first feature into map order. No feature means no route.
    pub fn into_route(self) -> Result<Route, DirectionsError> {
        let Some(feature) = self.features.into_iter().next() else {
            return Ok(Route::default());
        };

        feature
            .geometry
            .coordinates
            .iter()
            .enumerate()
            .map(|(index, position)| project_position(index, position))
            .collect()
    }
}

fn project_position(index: usize, position: &[f64]) -> Result<Coordinate, DirectionsError> {
    match *position {
        [lon, lat, ..] => Coordinate::new(lat, lon).map_err(|err| {
            DirectionsError::InvalidResponse(format!("position {index}: {err}"))
        }),
        _ => Err(DirectionsError::InvalidResponse(format!(
            "position {index} has {} value(s)",
            position.len()
        ))),
    }
}

/// openrouteservice driving directions over a single GET.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl DirectionsClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Route between two points using the configured API key.
    pub async fn get_route(&self, start: Coordinate, end: Coordinate) -> Result<Route, DirectionsError> {
        self.get_route_with_key(self.config.api_key(), start, end)
            .await
    }

    #[tracing::instrument(skip(self, api_key))]
    pub async fn get_route_with_key(
        &self,
        api_key: &str,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Route, DirectionsError> {
        let query = DirectionsQuery::new(api_key, start, end);
        tracing::debug!("requesting route from {} to {}", query.start(), query.end());

        let res = self
            .http
            .get(self.config.endpoint(DIRECTIONS_PATH))
            .query(&query)
            .send()
            .await?;

        if let Some(err) = DirectionsError::from_status(res.status()) {
            tracing::warn!("directions provider answered {}: {err}", res.status());
            return Err(err);
        }

        let body: DirectionsResponse = res.json().await?;
        let route = body.into_route()?;
        tracing::info!(
            "route fetched with {} points ({:.2} km)",
            route.len(),
            route.length_km()
        );
        Ok(route)
    }
}

#[async_trait]
impl DirectionsProvider for DirectionsClient {
    async fn route(&self, request: RouteRequest) -> Result<Route, DirectionsError> {
        self.get_route(request.origin, request.destination).await
    }
}
