use thiserror::Error;

use crate::model::SourceId;

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("malformed isochrone for {source_id}: {message}")]
    MalformedIsochrone { source_id: SourceId, message: String },
    #[error("cumulative isochrones for {source_id} are not ordered by nesting: {message}")]
    InvalidOrdering { source_id: SourceId, message: String },
    #[error("failure during geometry overlay: {0}")]
    GeometryOperation(String),
    #[error("isochrones [{left}] and [{right}] share no reachable area")]
    EmptyMergeInconsistency { left: String, right: String },
    #[error("no isochrones provided for aggregation")]
    EmptyInput,
    #[error("{0}")]
    InternalError(String),
}
