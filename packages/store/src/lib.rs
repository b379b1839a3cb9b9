#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate cache and proximity ranking.
//!
//! The cache is a JSON array of `{address, latitude, longitude}` objects
//! keyed by exact address text. It is read wholesale at the start of a
//! run, consulted to skip geocoding for known addresses, and written back
//! wholesale (pretty-printed) at the end. The cache is an optimization
//! only: a corrupt or missing file degrades to a cold start, never an
//! error. Entries are never invalidated — staleness is accepted.
//!
//! Ranking annotates each resolved development with its great-circle
//! distance from the target and returns the closest `top_n`, excluding
//! anything that never resolved.

pub mod report;

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dev_comps_models::{Development, GeoPoint};

/// Errors from cache and report persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One persisted geocoding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Exact address text as scraped (the lookup key).
    pub address: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// A development annotated with its distance from the target point.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDevelopment {
    /// The underlying development.
    pub development: Development,
    /// Great-circle distance from the target, in miles.
    pub distance_miles: f64,
}

/// Loads the cache file, treating a missing or malformed file as empty.
#[must_use]
pub fn load_cache(path: &Path) -> Vec<CacheEntry> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        log::info!("No cache at {} — cold start", path.display());
        return Vec::new();
    };

    match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!(
                "Cache at {} is malformed ({e}) — treating as empty",
                path.display()
            );
            Vec::new()
        }
    }
}

/// Writes the full cache back to disk, pretty-printed.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the file write fails.
pub fn save_cache(path: &Path, entries: &[CacheEntry]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Partitions scraped developments into cache hits (with coordinates
/// hydrated from the cache) and misses that still need geocoding.
///
/// Both partitions preserve scrape order.
#[must_use]
pub fn split_by_cache(
    developments: Vec<Development>,
    cache: &[CacheEntry],
) -> (Vec<Development>, Vec<Development>) {
    let index: std::collections::BTreeMap<&str, GeoPoint> = cache
        .iter()
        .map(|entry| {
            (
                entry.address.as_str(),
                GeoPoint {
                    latitude: entry.latitude,
                    longitude: entry.longitude,
                },
            )
        })
        .collect();

    let mut hits = Vec::new();
    let mut misses = Vec::new();

    for mut dev in developments {
        if let Some(point) = index.get(dev.address.as_str()) {
            dev.location = Some(*point);
            hits.push(dev);
        } else {
            misses.push(dev);
        }
    }

    (hits, misses)
}

/// Ranks developments by ascending distance from `target` and truncates
/// to the closest `top_n`.
///
/// Developments without resolved coordinates (or with NaN coordinates)
/// are excluded entirely rather than sorted last — the report should not
/// claim "closest N" while including unresolved entries. The sort is
/// stable, so ties keep their original scrape order.
#[must_use]
pub fn rank(developments: &[Development], target: GeoPoint, top_n: usize) -> Vec<RankedDevelopment> {
    let mut ranked: Vec<RankedDevelopment> = developments
        .iter()
        .filter_map(|dev| {
            let location = dev.location?;
            let distance_miles = dev_comps_spatial::distance_miles(
                location.latitude,
                location.longitude,
                target.latitude,
                target.longitude,
            );
            distance_miles.is_finite().then(|| RankedDevelopment {
                development: dev.clone(),
                distance_miles,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_miles
            .partial_cmp(&b.distance_miles)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_n);
    ranked
}
