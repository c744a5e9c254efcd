use heatmap_core::{error::HeatmapError, model::SourceId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeatmapAppError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("address not found: '{0}'")]
    AddressNotFound(String),
    #[error("failure geocoding '{address}': {message}")]
    GeocodeError { address: String, message: String },
    #[error("failure fetching isochrones for {source_id}: {message}")]
    FetchError { source_id: SourceId, message: String },
    #[error("failure writing heatmap output: {0}")]
    OutputError(String),
    #[error("failure aggregating isochrones: {source}")]
    AggregationError {
        #[from]
        source: HeatmapError,
    },
    #[error("failure reading or writing file: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure decoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
}
