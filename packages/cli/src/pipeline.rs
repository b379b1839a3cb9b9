//! Linear pipeline orchestrator.
//!
//! Runs geocode-target → scrape → cache split → batch geocode → merge →
//! rank → persist cache → emit report. The only fatal geocoding failure
//! is the target address itself; individual developments that cannot be
//! resolved are logged and excluded from the report.

use std::path::PathBuf;
use std::time::Instant;

use dev_comps_geocoder::batch::{INTER_CHUNK_DELAY, geocode_batch};
use dev_comps_geocoder::service_registry::enabled_services;
use dev_comps_models::{Development, GeoPoint};
use dev_comps_scraper::{ListingConfig, ScrapeError, listing::scrape_developments};
use dev_comps_store::{
    CacheEntry, StoreError, load_cache, rank, report::write_report, save_cache, split_by_cache,
};

/// Resolved CLI options for one pipeline run.
pub struct PipelineOptions {
    /// The address nearby developments are ranked against.
    pub target_address: String,
    /// Maximum listing pages to scrape.
    pub max_pages: u32,
    /// Delay between listing page fetches, in milliseconds.
    pub page_delay_ms: u64,
    /// Addresses geocoded concurrently per batch.
    pub batch_size: usize,
    /// Number of closest developments to report.
    pub top_n: usize,
    /// Path of the JSON coordinate cache.
    pub cache_path: PathBuf,
    /// Path of the Markdown report.
    pub report_path: PathBuf,
}

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// No provider could geocode the target address. Without a target
    /// point no ranking is possible, so this aborts the run.
    #[error("could not geocode target address '{address}' with any provider")]
    TargetUnresolved {
        /// The address that failed to resolve.
        address: String,
    },

    /// The listing scrape failed before producing any pages.
    #[error("scrape failed: {0}")]
    Scrape(#[from] ScrapeError),

    /// Cache or report persistence failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Runs the full pipeline.
///
/// # Errors
///
/// Returns [`PipelineError::TargetUnresolved`] if the target address
/// cannot be geocoded, or a scrape/store/client error if setup or
/// persistence fails. Per-development geocoding failures are not errors.
pub async fn run(options: &PipelineOptions) -> Result<(), PipelineError> {
    let start = Instant::now();

    let client = reqwest::Client::builder().build()?;
    let services = enabled_services();

    // --- Geocode target (the one fatal geocoding step) ---
    log::info!("Geocoding target address '{}'...", options.target_address);
    let target =
        dev_comps_geocoder::geocode(&client, &services, &options.target_address)
            .await
            .ok_or_else(|| PipelineError::TargetUnresolved {
                address: options.target_address.clone(),
            })?;
    let target_point = GeoPoint {
        latitude: target.latitude,
        longitude: target.longitude,
    };
    log::info!(
        "Target at {:.6}, {:.6} (via {})",
        target_point.latitude,
        target_point.longitude,
        target.provider.id()
    );

    // --- Scrape the listing ---
    let listing = ListingConfig::default()
        .with_max_pages(options.max_pages)
        .with_delay_ms(options.page_delay_ms);
    let developments = scrape_developments(&client, &listing).await?;
    log::info!("Found {} developments", developments.len());

    // --- Split against the cache ---
    let mut cache = load_cache(&options.cache_path);
    let (resolved, misses) = split_by_cache(developments, &cache);
    log::info!(
        "{} cache hits, {} addresses to geocode",
        resolved.len(),
        misses.len()
    );

    // --- Batch geocode the misses ---
    let addresses: Vec<String> = misses.iter().map(|d| d.address.clone()).collect();
    let geocode_start = Instant::now();
    let results = geocode_batch(
        |address| {
            let client = client.clone();
            let services = services.clone();
            async move { dev_comps_geocoder::geocode(&client, &services, &address).await }
        },
        &addresses,
        options.batch_size,
        INTER_CHUNK_DELAY,
    )
    .await;
    log::info!(
        "Geocoded {} addresses in {:.2}s",
        addresses.len(),
        geocode_start.elapsed().as_secs_f64()
    );

    // --- Merge fresh results, collecting new cache entries ---
    let merged = merge_results(resolved, misses, &results, &mut cache);

    // --- Rank, persist, report ---
    let ranked = rank(&merged, target_point, options.top_n);

    save_cache(&options.cache_path, &cache)?;
    write_report(&options.report_path, &ranked)?;

    log::info!(
        "Wrote {} closest developments to {} ({} cached) in {:.1}s",
        ranked.len(),
        options.report_path.display(),
        cache.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Applies batch geocoding results back onto the miss list (index `i` of
/// `results` corresponds to `misses[i]`), appends each success to the
/// cache, and re-joins the cache-hit partition.
///
/// Failed addresses keep `location: None` and are not cached, so they
/// are retried on the next run.
fn merge_results(
    resolved: Vec<Development>,
    misses: Vec<Development>,
    results: &[Option<dev_comps_geocoder::GeocodedAddress>],
    cache: &mut Vec<CacheEntry>,
) -> Vec<Development> {
    let mut merged = resolved;

    for (mut dev, result) in misses.into_iter().zip(results) {
        if let Some(geocoded) = result {
            dev.location = Some(GeoPoint {
                latitude: geocoded.latitude,
                longitude: geocoded.longitude,
            });
            cache.push(CacheEntry {
                address: dev.address.clone(),
                latitude: geocoded.latitude,
                longitude: geocoded.longitude,
            });
        } else {
            log::warn!("No provider could resolve '{}'", dev.address);
        }
        merged.push(dev);
    }

    merged
}
