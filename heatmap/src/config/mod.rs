mod cutoff_range;
mod geocoder_config;
mod heatmap_config;
mod location_config;
mod router_config;

pub use cutoff_range::CutoffRange;
pub use geocoder_config::GeocoderConfig;
pub use heatmap_config::HeatmapConfiguration;
pub use location_config::LocationConfig;
pub use router_config::RouterConfig;
