//! First-success racing of provider calls.
//!
//! All participants run concurrently and are consumed in completion
//! order; the first structurally valid result wins. Dropping the race
//! cancels whatever is still in flight.

use futures::stream::{FuturesUnordered, StreamExt as _};

use crate::{GeocodeError, GeocodedAddress};

/// Drives all `participants` concurrently and returns the first
/// [`GeocodedAddress`] any of them produces.
///
/// A participant that errors or resolves to `Ok(None)` is discarded and
/// the race continues; once every participant has settled without a
/// match, the race yields `None`. Remaining in-flight participants are
/// dropped as soon as a winner is found.
pub async fn first_match<F>(participants: impl IntoIterator<Item = F>) -> Option<GeocodedAddress>
where
    F: Future<Output = Result<Option<GeocodedAddress>, GeocodeError>>,
{
    let mut in_flight: FuturesUnordered<F> = participants.into_iter().collect();

    while let Some(outcome) = in_flight.next().await {
        match outcome {
            Ok(Some(geocoded)) => return Some(geocoded),
            Ok(None) => {}
            Err(e) => log::debug!("Race participant failed: {e}"),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeocodingProvider;
    use std::time::Duration;

    type Participant = futures::future::BoxFuture<'static, Result<Option<GeocodedAddress>, GeocodeError>>;

    fn hit(provider: GeocodingProvider, latitude: f64) -> GeocodedAddress {
        GeocodedAddress {
            latitude,
            longitude: -71.06,
            score: 95.0,
            matched_address: None,
            provider,
        }
    }

    #[tokio::test]
    async fn failing_participant_does_not_mask_a_success() {
        let participants = vec![
            Box::pin(async {
                Err(GeocodeError::Parse {
                    message: "boom".to_string(),
                })
            }) as Participant,
            Box::pin(async { Ok(Some(hit(GeocodingProvider::Nominatim, 42.36))) }),
        ];

        let winner = first_match(participants).await.unwrap();
        assert_eq!(winner.provider, GeocodingProvider::Nominatim);
    }

    #[tokio::test]
    async fn all_failures_yield_none() {
        let participants = vec![
            Box::pin(async {
                Err(GeocodeError::Parse {
                    message: "bad json".to_string(),
                })
            }) as Participant,
            Box::pin(async { Ok(None) }),
            Box::pin(async { Err(GeocodeError::Timeout(Duration::from_secs(15))) }),
        ];

        assert!(first_match(participants).await.is_none());
    }

    #[tokio::test]
    async fn no_participants_yield_none() {
        let participants: Vec<Participant> = Vec::new();
        assert!(first_match(participants).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn fastest_valid_answer_wins() {
        let participants = vec![
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(Some(hit(GeocodingProvider::ArcgisWorld, 1.0)))
            }) as Participant,
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(Some(hit(GeocodingProvider::BostonArcgis, 2.0)))
            }),
        ];

        let winner = first_match(participants).await.unwrap();
        assert_eq!(winner.provider, GeocodingProvider::BostonArcgis);
    }

    #[tokio::test(start_paused = true)]
    async fn early_empty_result_does_not_end_the_race() {
        let participants = vec![
            Box::pin(async { Ok(None) }) as Participant,
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(Some(hit(GeocodingProvider::ArcgisWorld, 42.35)))
            }),
        ];

        let winner = first_match(participants).await.unwrap();
        assert_eq!(winner.provider, GeocodingProvider::ArcgisWorld);
    }
}
