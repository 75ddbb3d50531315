//! Natal-chart computation for the astrology flow.
//!
//! Three external collaborators sit behind traits so the engine can be
//! tested without the network: a geocoder resolving the birth city, a
//! timezone resolver for the historical UTC offset, and an ephemeris
//! source returning raw ecliptic longitudes. [`chart`] holds the pure math
//! that turns longitudes into signs and houses; [`engine`] wires it all
//! together.

pub mod chart;
pub mod engine;
pub mod ephemeris;
pub mod geocode;
pub mod timezone;

pub use engine::ChartEngine;
pub use ephemeris::{Ephemeris, EphemerisSource, HttpEphemeris};
pub use geocode::{GeoPoint, Geocoder, NominatimClient};
pub use timezone::{FixedOffsetResolver, HttpTimezoneResolver, TimezoneResolver};

/// Errors from chart computation and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AstroError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A collaborator returned a non-2xx status code.
    #[error("Astro service error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The geocoder found no match for the city.
    #[error("Cidade '{0}' não encontrada. Verifique a grafia e tente novamente.")]
    CityNotFound(String),

    /// A response parsed but was missing or contradicting required data.
    #[error("Malformed astro response: {0}")]
    Malformed(String),
}

impl AstroError {
    /// Surface a non-2xx response as [`AstroError::ApiError`].
    pub(crate) async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AstroError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AstroError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
