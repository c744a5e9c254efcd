use crate::app::HeatmapAppError;
use geo::Point;
use heatmap_core::model::{RawCumulativeSequence, SourceId};

/// computes the cumulative isochrones of one (address, direction) pair.
///
/// implementations return one polygon per cutoff, ordered by increasing cutoff time.
pub trait IsochroneProvider: Send + Sync {
    fn fetch(
        &self,
        source: &SourceId,
        origin: Point<f64>,
        cutoffs_seconds: &[u64],
    ) -> Result<RawCumulativeSequence, HeatmapAppError>;
}
