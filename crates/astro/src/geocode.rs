//! Birth-city geocoding.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::AstroError;

/// Wall-clock limit for a geocoding call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A resolved birth place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical display name returned by the geocoder.
    pub display_name: String,
}

/// Resolves a free-text city name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve the best match for `city`, or [`AstroError::CityNotFound`].
    async fn geocode(&self, city: &str) -> Result<GeoPoint, AstroError>;
}

// ---------------------------------------------------------------------------
// Nominatim
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocoder backed by a Nominatim-compatible search endpoint.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// * `base_url` - e.g. `https://nominatim.openstreetmap.org`.
    /// * `user_agent` - required by Nominatim's usage policy.
    pub fn new(base_url: String, user_agent: &str) -> Result<Self, AstroError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, city: &str) -> Result<GeoPoint, AstroError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let hits: Vec<NominatimHit> = AstroError::ensure_success(response).await?.json().await?;
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| AstroError::CityNotFound(city.to_string()))?;

        let latitude: f64 = hit
            .lat
            .parse()
            .map_err(|_| AstroError::Malformed(format!("unparseable latitude '{}'", hit.lat)))?;
        let longitude: f64 = hit
            .lon
            .parse()
            .map_err(|_| AstroError::Malformed(format!("unparseable longitude '{}'", hit.lon)))?;

        Ok(GeoPoint {
            latitude,
            longitude,
            display_name: hit.display_name,
        })
    }
}
