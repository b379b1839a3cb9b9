//! ArcGIS `findAddressCandidates` client.
//!
//! Both the Esri World geocoder and the City of Boston composite locator
//! expose the same `GeocodeServer` REST schema, so one client serves both;
//! the caller supplies the provenance tag and any candidate filters.
//!
//! See <https://developers.arcgis.com/rest/geocode/api-reference/geocoding-find-address-candidates.htm>

use crate::{GeocodeError, GeocodedAddress, GeocodingProvider};

/// Geocodes a single free-text address against an ArcGIS `GeocodeServer`.
///
/// Requests WGS84 output (`outSR=4326`) and at most one candidate. The
/// optional `category` and `country_code` filters are only honoured by the
/// World geocoder; the Boston locator ignores unknown parameters.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_single(
    client: &reqwest::Client,
    base_url: &str,
    provider: GeocodingProvider,
    category: Option<&str>,
    country_code: Option<&str>,
    address: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let url = format!("{base_url}/findAddressCandidates");

    let mut query: Vec<(&str, &str)> = vec![
        ("SingleLine", address),
        ("f", "json"),
        ("outSR", "4326"),
        ("maxLocations", "1"),
    ];
    if let Some(cat) = category {
        query.push(("category", cat));
    }
    if let Some(cc) = country_code {
        query.push(("countryCode", cc));
    }

    let resp = client.get(&url).query(&query).send().await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body, provider)
}

/// Parses an ArcGIS candidates response.
fn parse_response(
    body: &serde_json::Value,
    provider: GeocodingProvider,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let candidates = body["candidates"]
        .as_array()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing candidates array".to_string(),
        })?;

    let Some(first) = candidates.first() else {
        return Ok(None);
    };

    let x = first
        .pointer("/location/x")
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Candidate missing location.x".to_string(),
        })?;
    let y = first
        .pointer("/location/y")
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Candidate missing location.y".to_string(),
        })?;

    let score = first["score"].as_f64().unwrap_or(0.0);
    let matched_address = first["address"].as_str().map(String::from);

    Ok(Some(GeocodedAddress {
        latitude: y,
        longitude: x,
        score,
        matched_address,
        provider,
    }))
}
