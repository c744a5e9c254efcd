use std::time::Duration;

use geo::Point;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::Geocoder;
use crate::{app::HeatmapAppError, config::GeocoderConfig};

/// geocodes addresses with the search endpoint of a Nominatim service.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Deserialize, Debug)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<NominatimGeocoder, HeatmapAppError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                HeatmapAppError::ConfigurationError(format!("failure building geocoder client: {e}"))
            })?;
        Ok(NominatimGeocoder {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Point<f64>, HeatmapAppError> {
        let geocode_error = |message: String| HeatmapAppError::GeocodeError {
            address: address.to_string(),
            message,
        };
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| geocode_error(format!("GET request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(geocode_error(format!("{url} responded with status {status}")));
        }
        let body = response
            .text()
            .map_err(|e| geocode_error(format!("reading response failed: {e}")))?;
        parse_search_response(address, &body)
    }
}

/// reads the first place of a Nominatim JSON search response
fn parse_search_response(address: &str, body: &str) -> Result<Point<f64>, HeatmapAppError> {
    let geocode_error = |message: String| HeatmapAppError::GeocodeError {
        address: address.to_string(),
        message,
    };
    let places: Vec<NominatimPlace> = serde_json::from_str(body)
        .map_err(|e| geocode_error(format!("failure decoding search response: {e}")))?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| HeatmapAppError::AddressNotFound(address.to_string()))?;
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|e| geocode_error(format!("invalid latitude '{}': {e}", place.lat)))?;
    let lon = place
        .lon
        .parse::<f64>()
        .map_err(|e| geocode_error(format!("invalid longitude '{}': {e}", place.lon)))?;
    log::info!(
        "geocoded '{address}' to ({lat}, {lon}) {}",
        place.display_name.unwrap_or_default()
    );
    Ok(Point::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::parse_search_response;
    use crate::app::HeatmapAppError;

    #[test]
    fn test_parse_first_place() {
        let body = r#"[
            {"place_id": 1, "lat": "60.1719", "lon": "24.9414", "display_name": "Rautatientori, Helsinki"},
            {"place_id": 2, "lat": "0.0", "lon": "0.0"}
        ]"#;
        let point = parse_search_response("Rautatientori, Helsinki", body).unwrap();
        assert_eq!(point.x(), 24.9414);
        assert_eq!(point.y(), 60.1719);
    }

    #[test]
    fn test_no_results_is_not_found() {
        let result = parse_search_response("Nowhere 1", "[]");
        assert!(matches!(result, Err(HeatmapAppError::AddressNotFound(a)) if a == "Nowhere 1"));
    }

    #[test]
    fn test_invalid_body_is_geocode_error() {
        let result = parse_search_response("Nowhere 1", "<html></html>");
        assert!(matches!(result, Err(HeatmapAppError::GeocodeError { .. })));
    }
}
