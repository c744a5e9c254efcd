use geo::Point;
use serde::{Deserialize, Serialize};

/// an address to include in the heatmap. when a coordinate is given as
/// `[latitude, longitude]`, the address is not geocoded.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LocationConfig {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<[f64; 2]>,
}

impl LocationConfig {
    pub fn new(address: &str) -> LocationConfig {
        LocationConfig {
            address: address.to_string(),
            coordinate: None,
        }
    }

    /// the configured coordinate as a point with x = longitude and y = latitude
    pub fn point(&self) -> Option<Point<f64>> {
        self.coordinate.map(|[lat, lon]| Point::new(lon, lat))
    }
}
