#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared domain types for the comparable-development pipeline.
//!
//! A [`Development`] is one project scraped from the bostonplans.org
//! listing. Its coordinates start out unknown and are filled in either
//! from the on-disk cache or by the geocoder; `Option<GeoPoint>` is the
//! only "not yet resolved" representation — no NaN or (0, 0) sentinels.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// One development project from the public listing.
///
/// The `address` is the natural key: cache lookups and de-duplication
/// against previously geocoded entries match on the exact address text.
/// Within a scrape, entries are de-duplicated by `link` instead, since
/// the listing occasionally repeats the same project card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Development {
    /// Free-text street address as shown on the listing card.
    pub address: String,
    /// Absolute URL of the project detail page.
    pub link: String,
    /// Resolved coordinates, or `None` until geocoded.
    pub location: Option<GeoPoint>,
}

impl Development {
    /// Creates a development with unresolved coordinates.
    #[must_use]
    pub const fn new(address: String, link: String) -> Self {
        Self {
            address,
            link,
            location: None,
        }
    }
}
