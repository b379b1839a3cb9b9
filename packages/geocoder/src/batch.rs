//! Order-preserving batch geocoding.
//!
//! Addresses are processed in consecutive chunks: every address in a
//! chunk is geocoded concurrently, and a fixed pause separates chunks to
//! stay inside the informal rate limits of the free public geocoders.

use std::time::Duration;

use futures::future::join_all;

use crate::GeocodedAddress;

/// Pause inserted between consecutive chunks.
pub const INTER_CHUNK_DELAY: Duration = Duration::from_millis(100);

/// Geocodes `addresses` in chunks of `batch_size`, returning one result
/// per input address at the same index.
///
/// Within a chunk all lookups run concurrently and every one settles
/// independently; a failed address yields `None` at its position without
/// affecting its siblings. The output always has the same length and
/// order as the input, so callers can zip results back onto their source
/// list without a key join.
///
/// `geocode_fn` is the per-address resolver (in production, a closure
/// around [`crate::geocode`]).
pub async fn geocode_batch<F, Fut>(
    geocode_fn: F,
    addresses: &[String],
    batch_size: usize,
    inter_chunk_delay: Duration,
) -> Vec<Option<GeocodedAddress>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<GeocodedAddress>>,
{
    let batch_size = batch_size.max(1);
    let mut results: Vec<Option<GeocodedAddress>> = Vec::with_capacity(addresses.len());

    for (chunk_index, chunk) in addresses.chunks(batch_size).enumerate() {
        if chunk_index > 0 {
            tokio::time::sleep(inter_chunk_delay).await;
        }

        // join_all preserves input order regardless of completion order.
        let chunk_results = join_all(chunk.iter().map(|addr| geocode_fn(addr.clone()))).await;

        let failed = chunk_results.iter().filter(|r| r.is_none()).count();
        if failed > 0 {
            log::debug!(
                "Chunk {chunk_index}: {failed}/{} addresses unresolved",
                chunk.len()
            );
        }

        results.extend(chunk_results);
    }

    results
}
