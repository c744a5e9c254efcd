use serde::{Deserialize, Serialize};

/// connection parameters for a Nominatim geocoding service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://nominatim.openstreetmap.org"),
            user_agent: format!("heatmap/{}", env!("CARGO_PKG_VERSION")),
            timeout_seconds: 30,
        }
    }
}
