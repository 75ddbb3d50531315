//! Historical UTC-offset resolution for the birth instant.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::geocode::GeoPoint;
use crate::AstroError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves the UTC offset in effect at a place and local instant.
#[async_trait]
pub trait TimezoneResolver: Send + Sync {
    /// Offset in seconds east of UTC at `local` in `place`.
    async fn utc_offset_seconds(
        &self,
        place: &GeoPoint,
        local: NaiveDateTime,
    ) -> Result<i32, AstroError>;
}

// ---------------------------------------------------------------------------
// HTTP resolver
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OffsetResponse {
    utc_offset_seconds: i32,
}

/// Resolver backed by a timezone lookup endpoint.
pub struct HttpTimezoneResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTimezoneResolver {
    pub fn new(base_url: String) -> Result<Self, AstroError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl TimezoneResolver for HttpTimezoneResolver {
    async fn utc_offset_seconds(
        &self,
        place: &GeoPoint,
        local: NaiveDateTime,
    ) -> Result<i32, AstroError> {
        let response = self
            .client
            .get(format!("{}/offset", self.base_url))
            .query(&[
                ("lat", place.latitude.to_string()),
                ("lon", place.longitude.to_string()),
                ("datetime", local.format("%Y-%m-%dT%H:%M:%S").to_string()),
            ])
            .send()
            .await?;

        let parsed: OffsetResponse = AstroError::ensure_success(response).await?.json().await?;
        Ok(parsed.utc_offset_seconds)
    }
}

/// Constant-offset resolver, for deployments that pin a timezone and for
/// tests.
pub struct FixedOffsetResolver(pub i32);

#[async_trait]
impl TimezoneResolver for FixedOffsetResolver {
    async fn utc_offset_seconds(
        &self,
        _place: &GeoPoint,
        _local: NaiveDateTime,
    ) -> Result<i32, AstroError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[tokio::test]
    async fn fixed_resolver_ignores_inputs() {
        let resolver = FixedOffsetResolver(-3 * 3600);
        let place = GeoPoint {
            latitude: -23.55,
            longitude: -46.63,
            display_name: "São Paulo".to_string(),
        };
        let local = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            NaiveTime::from_hms_opt(17, 48, 0).unwrap(),
        );
        assert_eq!(
            resolver.utc_offset_seconds(&place, local).await.unwrap(),
            -10800
        );
    }

    #[test]
    fn offset_response_shape() {
        let parsed: OffsetResponse =
            serde_json::from_str(r#"{"utc_offset_seconds":-10800}"#).unwrap();
        assert_eq!(parsed.utc_offset_seconds, -10800);
    }
}
