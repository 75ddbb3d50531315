//! Raw ephemeris data: ecliptic longitudes and house cusps.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use arcana_core::analysis::CHART_POINTS;

use crate::chart;
use crate::AstroError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw chart data for one birth instant and place, all in ecliptic
/// longitude degrees `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ephemeris {
    /// Longitude per chart point ("Sol", "Lua", ...). The ascendant is
    /// carried separately.
    pub points: BTreeMap<String, f64>,
    /// Placidus house cusps, first cusp equals the ascendant.
    pub house_cusps: [f64; 12],
    pub ascendant: f64,
}

impl Ephemeris {
    /// Check that every required chart point is present.
    pub fn validate(&self) -> Result<(), AstroError> {
        for point in CHART_POINTS {
            if *point == "Ascendente" {
                continue;
            }
            if !self.points.contains_key(*point) {
                return Err(AstroError::Malformed(format!(
                    "ephemeris is missing point '{point}'"
                )));
            }
        }
        Ok(())
    }
}

/// Computes raw ephemeris data for a UTC instant and place.
#[async_trait]
pub trait EphemerisSource: Send + Sync {
    async fn compute(
        &self,
        utc: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    ) -> Result<Ephemeris, AstroError>;
}

// ---------------------------------------------------------------------------
// HTTP source
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EphemerisRequest {
    julian_day: f64,
    latitude: f64,
    longitude: f64,
    house_system: &'static str,
}

/// Ephemeris backed by a chart-computation endpoint.
pub struct HttpEphemeris {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEphemeris {
    pub fn new(base_url: String) -> Result<Self, AstroError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl EphemerisSource for HttpEphemeris {
    async fn compute(
        &self,
        utc: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    ) -> Result<Ephemeris, AstroError> {
        let body = EphemerisRequest {
            julian_day: chart::julian_day_utc(utc),
            latitude,
            longitude,
            house_system: "placidus",
        };

        let response = self
            .client
            .post(format!("{}/chart", self.base_url))
            .json(&body)
            .send()
            .await?;

        let ephemeris: Ephemeris = AstroError::ensure_success(response).await?.json().await?;
        ephemeris.validate()?;
        Ok(ephemeris)
    }
}
