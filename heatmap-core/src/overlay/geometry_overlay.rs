use geo::MultiPolygon;

use super::OverlayOperation;
use crate::error::HeatmapError;

/// polygon boolean operations consumed by ring differencing and pairwise merging.
///
/// implementations must be shareable across reduction workers. an empty MultiPolygon
/// signals that there is no remainder (difference) or no overlap (intersection).
pub trait GeometryOverlay: Send + Sync {
    fn overlay(
        &self,
        subject: &MultiPolygon<f64>,
        clip: &MultiPolygon<f64>,
        operation: OverlayOperation,
    ) -> Result<MultiPolygon<f64>, HeatmapError>;

    fn difference(
        &self,
        subject: &MultiPolygon<f64>,
        clip: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, HeatmapError> {
        self.overlay(subject, clip, OverlayOperation::Difference)
    }

    fn intersection(
        &self,
        subject: &MultiPolygon<f64>,
        clip: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, HeatmapError> {
        self.overlay(subject, clip, OverlayOperation::Intersection)
    }

    fn union(
        &self,
        subject: &MultiPolygon<f64>,
        clip: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, HeatmapError> {
        self.overlay(subject, clip, OverlayOperation::Union)
    }
}
