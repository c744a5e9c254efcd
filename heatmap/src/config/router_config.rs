use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// connection and request parameters for an OpenTripPlanner isochrone endpoint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    pub base_url: String,
    pub router_id: String,
    pub modes: Vec<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub precision_meters: u32,
    pub timeout_seconds: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:8080"),
            router_id: String::from("hsl"),
            modes: ["WALK", "TRAM", "TRANSIT", "BUS", "SUBWAY", "RAIL", "FERRY"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            date: NaiveDate::from_ymd_opt(2021, 6, 3).unwrap_or_default(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            precision_meters: 100,
            timeout_seconds: 300,
        }
    }
}
