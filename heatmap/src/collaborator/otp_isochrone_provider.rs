use std::time::Duration;

use geo::Point;
use geojson::{FeatureCollection, GeoJson};
use heatmap_core::model::{RawCumulativeSequence, SourceId, TimeUnit, TravelDirection};
use itertools::Itertools;
use reqwest::blocking::Client;

use super::IsochroneProvider;
use crate::{app::HeatmapAppError, config::RouterConfig};

/// feature property holding each isochrone's cutoff, in seconds
const TIME_PROPERTY: &str = "time";

/// fetches cumulative isochrones from the isochrone endpoint of an OpenTripPlanner router.
pub struct OtpIsochroneProvider {
    client: Client,
    config: RouterConfig,
}

impl OtpIsochroneProvider {
    pub fn new(config: &RouterConfig) -> Result<OtpIsochroneProvider, HeatmapAppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                HeatmapAppError::ConfigurationError(format!("failure building router client: {e}"))
            })?;
        Ok(OtpIsochroneProvider {
            client,
            config: config.clone(),
        })
    }

    pub fn isochrone_url(&self) -> String {
        format!(
            "{}/otp/routers/{}/isochrone",
            self.config.base_url.trim_end_matches('/'),
            self.config.router_id
        )
    }

    /// builds the query for an isochrone request. arrival isochrones carry the
    /// address as both `toPlace` and `fromPlace`.
    pub fn query_parameters(
        &self,
        origin: Point<f64>,
        direction: TravelDirection,
        cutoffs_seconds: &[u64],
    ) -> Vec<(&'static str, String)> {
        let place = format!("{},{}", origin.y(), origin.x());
        let mut params = vec![];
        if direction == TravelDirection::To {
            params.push(("toPlace", place.clone()));
        }
        params.push(("fromPlace", place));
        params.push(("precisionMeters", self.config.precision_meters.to_string()));
        params.push(("mode", self.config.modes.iter().join(",")));
        params.push(("time", self.config.time.format("%I:%M%P").to_string()));
        params.push(("date", self.config.date.format("%m-%d-%Y").to_string()));
        for cutoff in cutoffs_seconds {
            params.push(("cutoffSec", cutoff.to_string()));
        }
        params
    }
}

impl IsochroneProvider for OtpIsochroneProvider {
    fn fetch(
        &self,
        source: &SourceId,
        origin: Point<f64>,
        cutoffs_seconds: &[u64],
    ) -> Result<RawCumulativeSequence, HeatmapAppError> {
        let fetch_error = |message: String| HeatmapAppError::FetchError {
            source_id: source.clone(),
            message,
        };
        let url = self.isochrone_url();
        let params = self.query_parameters(origin, source.direction, cutoffs_seconds);
        log::debug!("requesting {} isochrones for {source}", cutoffs_seconds.len());
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| fetch_error(format!("GET request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("{url} responded with status {status}")));
        }
        let body = response
            .text()
            .map_err(|e| fetch_error(format!("reading response failed: {e}")))?;
        parse_isochrone_response(source, &body)
    }
}

/// reads a router response body into a cumulative sequence in increasing cutoff order
pub fn parse_isochrone_response(
    source: &SourceId,
    body: &str,
) -> Result<RawCumulativeSequence, HeatmapAppError> {
    let fetch_error = |message: String| HeatmapAppError::FetchError {
        source_id: source.clone(),
        message,
    };
    let geojson = body
        .parse::<GeoJson>()
        .map_err(|e| fetch_error(format!("response is not GeoJSON: {e}")))?;
    let collection = FeatureCollection::try_from(geojson)
        .map_err(|e| fetch_error(format!("response is not a FeatureCollection: {e}")))?;
    let sequence = RawCumulativeSequence::try_from_feature_collection(
        source.clone(),
        &collection,
        TIME_PROPERTY,
        TimeUnit::Seconds,
    )?;
    Ok(sequence.into_time_order())
}
