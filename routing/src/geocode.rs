use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::Coordinate;

use crate::{config::ProviderConfig, error::GeocodeError};

pub const GEOCODE_PATH: &str = "geocode/search";

/// Forward geocoding: free text to the best-matching coordinate.
///
/// Every failure (no network, service error, no match) is `None`; callers only
/// need to know whether they got a point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Option<Coordinate>;
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    api_key: &'a str,
    text: &'a str,
    size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    features: Vec<SearchFeature>,
}

#[derive(Debug, Deserialize)]
struct SearchFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: Vec<f64>,
}

impl SearchResponse {
    fn first_match(self) -> Result<Option<Coordinate>, GeocodeError> {
        let Some(feature) = self.features.into_iter().next() else {
            return Ok(None);
        };
        match feature.geometry.coordinates[..] {
            [lon, lat, ..] => Coordinate::new(lat, lon)
                .map(Some)
                .map_err(|err| GeocodeError::InvalidPosition(err.to_string())),
            ref other => Err(GeocodeError::InvalidPosition(format!(
                "{} value(s) in point",
                other.len()
            ))),
        }
    }
}

/// openrouteservice (Pelias) search endpoint, first candidate only.
#[derive(Debug, Clone)]
pub struct OrsGeocoder {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl OrsGeocoder {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    /// Like [`Geocoder::geocode`] but keeps the failure cause.
    pub async fn search(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let query = SearchQuery {
            api_key: self.config.api_key(),
            text: address,
            size: 1,
            lang: self.config.language(),
        };

        let res = self
            .http
            .get(self.config.endpoint(GEOCODE_PATH))
            .query(&query)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(GeocodeError::Status(res.status()));
        }

        let body: SearchResponse = res.json().await?;
        body.first_match()
    }
}

#[async_trait]
impl Geocoder for OrsGeocoder {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Option<Coordinate> {
        let address = address.trim();
        if address.is_empty() {
            tracing::debug!("empty address, skipping geocoder");
            return None;
        }

        match self.search(address).await {
            Ok(Some(coordinate)) => {
                tracing::debug!("geocoded to {coordinate}");
                Some(coordinate)
            }
            Ok(None) => {
                tracing::info!("no geocoding match");
                None
            }
            Err(err) => {
                tracing::warn!("geocoding failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> SearchResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_first_match_swaps_to_lat_lon() {
        let body = r#"{"features": [
            {"geometry": {"type": "Point", "coordinates": [-99.1677, 19.4270]}},
            {"geometry": {"type": "Point", "coordinates": [-99.0, 19.0]}}
        ]}"#;
        let coordinate = parse(body).first_match().unwrap().unwrap();
        assert_eq!(coordinate.lat(), 19.4270);
        assert_eq!(coordinate.lon(), -99.1677);
    }

    #[test]
    fn test_no_features_is_no_match() {
        assert!(parse(r#"{"features": []}"#).first_match().unwrap().is_none());
    }

    #[test]
    fn test_bad_point_is_error() {
        let body = r#"{"features": [{"geometry": {"type": "Point", "coordinates": [1.0]}}]}"#;
        assert!(matches!(
            parse(body).first_match(),
            Err(GeocodeError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_query_omits_missing_language() {
        let query = SearchQuery {
            api_key: "k",
            text: "Lyon",
            size: 1,
            lang: None,
        };
        let value = serde_json::to_value(&query).unwrap();
        assert!(value.get("lang").is_none());
        assert_eq!(value["size"], 1);
    }

    #[tokio::test]
    async fn test_blank_address_makes_no_request() {
        let geocoder = OrsGeocoder::new(ProviderConfig::new("k").with_base_url("http://127.0.0.1:9"));
        assert_eq!(geocoder.geocode("   ").await, None);
    }
}
