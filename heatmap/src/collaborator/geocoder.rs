use crate::app::HeatmapAppError;
use geo::Point;

/// resolves a free-text address to a coordinate (x = longitude, y = latitude).
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Point<f64>, HeatmapAppError>;
}
