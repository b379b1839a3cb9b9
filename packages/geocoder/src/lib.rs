#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Multi-provider geocoding for the comparable-development pipeline.
//!
//! Converts street addresses to latitude/longitude coordinates using a
//! multi-provider race configured via TOML files in `services/`:
//!
//! 1. **ArcGIS World Geocoder** — free tier, address-category filtered.
//! 2. **Boston Composite Locator** — the city's own ArcGIS locator, best
//!    coverage for Boston addresses.
//! 3. **Nominatim / OpenStreetMap** — free, viewbox-bounded to Boston.
//!
//! Unlike a priority chain, [`geocode`] fires all enabled providers
//! concurrently for the same address and takes the **first** structurally
//! valid answer; the free geocoders have uneven availability and coverage,
//! so racing them maximises both hit-rate and latency. A provider that
//! errors, times out, or returns no candidates simply loses the race.
//!
//! [`batch::geocode_batch`] applies [`geocode`] across many addresses with
//! bounded per-chunk concurrency and inter-chunk pacing.

pub mod arcgis;
pub mod batch;
pub mod nominatim;
pub mod race;
pub mod service_registry;

use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::service_registry::{GeocodingService, ProviderConfig};

/// A geocoding result with coordinates and metadata.
#[derive(Debug, Clone)]
pub struct GeocodedAddress {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Provider-reported match confidence (0-100).
    pub score: f64,
    /// The matched/canonical address returned by the geocoder.
    pub matched_address: Option<String>,
    /// Which provider resolved this address.
    pub provider: GeocodingProvider,
}

/// Which geocoding provider resolved an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingProvider {
    /// Esri's public World geocoder.
    ArcgisWorld,
    /// The City of Boston composite locator.
    BostonArcgis,
    /// Nominatim / `OpenStreetMap`.
    Nominatim,
}

impl GeocodingProvider {
    /// Stable identifier for logging and provenance.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ArcgisWorld => "arcgis_world",
            Self::BostonArcgis => "boston_arcgis",
            Self::Nominatim => "nominatim",
        }
    }
}

/// Errors from a single provider call.
///
/// These never escape [`geocode`]: a failing provider is a lost race
/// participant, and an address no provider can resolve yields `None`.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The provider did not answer within its configured timeout.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves a free-text address by racing all enabled providers.
///
/// Returns the first structurally valid result in completion order, or
/// `None` once every participant has settled without a match. Outstanding
/// requests are dropped as soon as a winner is found.
pub async fn geocode(
    client: &reqwest::Client,
    services: &[GeocodingService],
    address: &str,
) -> Option<GeocodedAddress> {
    let mut participants: Vec<BoxFuture<'static, Result<Option<GeocodedAddress>, GeocodeError>>> =
        Vec::new();

    for service in services.iter().filter(|s| s.enabled) {
        let limit = Duration::from_secs(service.timeout_secs);
        let client = client.clone();
        let address = address.to_owned();

        let fut: BoxFuture<'static, _> = match service.provider.clone() {
            ProviderConfig::ArcgisWorld {
                base_url,
                category,
                country_code,
            } => Box::pin(async move {
                with_timeout(
                    limit,
                    arcgis::geocode_single(
                        &client,
                        &base_url,
                        GeocodingProvider::ArcgisWorld,
                        Some(&category),
                        Some(&country_code),
                        &address,
                    ),
                )
                .await
            }),
            ProviderConfig::BostonArcgis { base_url } => Box::pin(async move {
                with_timeout(
                    limit,
                    arcgis::geocode_single(
                        &client,
                        &base_url,
                        GeocodingProvider::BostonArcgis,
                        None,
                        None,
                        &address,
                    ),
                )
                .await
            }),
            ProviderConfig::Nominatim {
                base_url,
                viewbox,
                user_agent,
            } => Box::pin(async move {
                with_timeout(
                    limit,
                    nominatim::geocode_freeform(&client, &base_url, &viewbox, &user_agent, &address),
                )
                .await
            }),
        };

        participants.push(fut);
    }

    if participants.is_empty() {
        log::warn!("No geocoding services enabled");
        return None;
    }

    race::first_match(participants).await
}

/// Bounds a provider call by the service's configured timeout so a hung
/// provider cannot block the race.
async fn with_timeout<F>(limit: Duration, fut: F) -> Result<Option<GeocodedAddress>, GeocodeError>
where
    F: Future<Output = Result<Option<GeocodedAddress>, GeocodeError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(outcome) => outcome,
        Err(_) => Err(GeocodeError::Timeout(limit)),
    }
}
