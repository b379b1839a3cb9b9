//! Nominatim / OpenStreetMap geocoder client.
//!
//! Queries are bounded to a configured viewbox (greater Boston) so that
//! ambiguous street names resolve locally rather than to same-named
//! streets elsewhere in the country. Nominatim has strict rate limits
//! (1 request per second on the public instance) and requires an
//! identifying User-Agent.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use crate::{GeocodeError, GeocodedAddress, GeocodingProvider};

/// Nominatim reports no confidence score; a viewbox-bounded hit is
/// treated as fully confident.
const BOUNDED_MATCH_SCORE: f64 = 100.0;

/// Geocodes a free-form address query using the Nominatim search endpoint.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    viewbox: &str,
    user_agent: &str,
    query: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let resp = client
        .get(base_url)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("limit", "1"),
            ("countrycodes", "us"),
            ("bounded", "1"),
            ("viewbox", viewbox),
        ])
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses a Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"].as_str().map(String::from);

    Ok(Some(GeocodedAddress {
        latitude: lat,
        longitude: lon,
        score: BOUNDED_MATCH_SCORE,
        matched_address: display_name,
        provider: GeocodingProvider::Nominatim,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "42.3609",
            "lon": "-71.1293",
            "display_name": "263, North Harvard Street, Allston, Boston, MA, USA"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 42.3609).abs() < 1e-4);
        assert!((result.longitude - -71.1293).abs() < 1e-4);
        assert_eq!(result.provider, GeocodingProvider::Nominatim);
        assert!((result.score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn non_array_response_is_a_parse_error() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn unparseable_coordinates_are_a_parse_error() {
        let body = serde_json::json!([{ "lat": "not-a-number", "lon": "-71.1" }]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
