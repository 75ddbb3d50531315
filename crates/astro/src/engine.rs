//! The chart engine: collaborators in, [`ChartData`] out.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use arcana_core::analysis::CHART_POINTS;
use arcana_core::session::{ChartData, Placement};

use crate::chart::{house_for_longitude, sign_for_longitude};
use crate::ephemeris::EphemerisSource;
use crate::geocode::{GeoPoint, Geocoder};
use crate::timezone::TimezoneResolver;
use crate::AstroError;

/// Computes natal charts from validated birth data.
pub struct ChartEngine {
    geocoder: Arc<dyn Geocoder>,
    timezones: Arc<dyn TimezoneResolver>,
    ephemeris: Arc<dyn EphemerisSource>,
}

impl ChartEngine {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        timezones: Arc<dyn TimezoneResolver>,
        ephemeris: Arc<dyn EphemerisSource>,
    ) -> Self {
        Self {
            geocoder,
            timezones,
            ephemeris,
        }
    }

    /// Resolve a birth city, used at configure time so a typo surfaces
    /// before payment rather than after.
    pub async fn validate_city(&self, city: &str) -> Result<GeoPoint, AstroError> {
        self.geocoder.geocode(city).await
    }

    /// Compute the chart for a birth instant and city.
    pub async fn compute(
        &self,
        dob: NaiveDate,
        tob: NaiveTime,
        city: &str,
    ) -> Result<ChartData, AstroError> {
        let place = self.geocoder.geocode(city).await?;
        let local = NaiveDateTime::new(dob, tob);
        let offset = self.timezones.utc_offset_seconds(&place, local).await?;
        let utc = local - Duration::seconds(offset as i64);

        tracing::debug!(
            city = %place.display_name,
            %utc,
            offset_seconds = offset,
            "computing natal chart"
        );

        let ephemeris = self
            .ephemeris
            .compute(utc, place.latitude, place.longitude)
            .await?;
        ephemeris.validate()?;

        let mut chart = ChartData::new();
        for point in CHART_POINTS {
            let placement = if *point == "Ascendente" {
                // The ascendant defines the first house cusp.
                Placement {
                    sign: sign_for_longitude(ephemeris.ascendant).to_string(),
                    house: 1,
                }
            } else {
                let longitude = *ephemeris
                    .points
                    .get(*point)
                    .ok_or_else(|| {
                        AstroError::Malformed(format!("ephemeris is missing point '{point}'"))
                    })?;
                Placement {
                    sign: sign_for_longitude(longitude).to_string(),
                    house: house_for_longitude(longitude, &ephemeris.house_cusps),
                }
            };
            chart.insert(point.to_string(), placement);
        }
        Ok(chart)
    }
}
