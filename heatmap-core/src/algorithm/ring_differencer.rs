use geo::{Area, MultiPolygon};

use crate::{
    error::HeatmapError,
    model::{CumulativePolygon, RawCumulativeSequence, SourceId, TimeBand, WeightedIsochrone},
    overlay::GeometryOverlay,
    util::geo_utils,
};

/// relative slack allowed when checking that each cumulative polygon contains the one
/// before it. routers simplify each isochrone independently.
const NESTING_AREA_TOLERANCE: f64 = 1e-6;

/// converts a sequence of nested cumulative isochrones into disjoint time bands.
///
/// the innermost polygon is kept as-is with its own cutoff time. every larger polygon is
/// differenced against the union of all polygons before it, leaving the ring of area that is
/// reachable within its cutoff but not within any earlier one. bands that come out empty are
/// dropped, so the result has at most one band per cutoff, each with divider 1.
///
/// # Arguments
///
/// * `sequence` - cumulative polygons in increasing cutoff order
/// * `overlay` - geometry backend providing polygon difference and union
///
/// # Returns
///
/// a WeightedIsochrone for the sequence's source, or an error if the sequence is empty,
/// carries non-finite times, or is not nested in increasing cutoff order
pub fn difference_rings(
    sequence: RawCumulativeSequence,
    overlay: &dyn GeometryOverlay,
) -> Result<WeightedIsochrone, HeatmapError> {
    let (source, polygons) = sequence.into_parts();
    validate_ordering(&source, &polygons, overlay)?;

    let mut bands = Vec::with_capacity(polygons.len());
    let mut covered = MultiPolygon::new(vec![]);
    for (idx, polygon) in polygons.iter().enumerate() {
        let ring = overlay.difference(&polygon.geometry, &covered)?;
        if geo_utils::is_degenerate(&ring) {
            log::debug!(
                "{source}: dropping empty band for cutoff {} minutes",
                polygon.time
            );
        } else {
            bands.push(TimeBand::new(ring, polygon.time));
        }
        if idx + 1 < polygons.len() {
            covered = overlay.union(&covered, &polygon.geometry)?;
        }
    }

    log::debug!(
        "{source}: {} cumulative polygons produced {} bands",
        polygons.len(),
        bands.len()
    );
    Ok(WeightedIsochrone::from_source(source, bands))
}

/// confirms the sequence is non-empty, with finite strictly increasing times and
/// each polygon contained in its successor up to a relative area tolerance.
fn validate_ordering(
    source: &SourceId,
    polygons: &[CumulativePolygon],
    overlay: &dyn GeometryOverlay,
) -> Result<(), HeatmapError> {
    if polygons.is_empty() {
        return Err(HeatmapError::MalformedIsochrone {
            source_id: source.clone(),
            message: String::from("sequence contains no cumulative polygons"),
        });
    }
    if let Some(bad) = polygons.iter().find(|p| !p.time.is_finite()) {
        return Err(HeatmapError::MalformedIsochrone {
            source_id: source.clone(),
            message: format!("cutoff time {} is not a finite number", bad.time),
        });
    }
    for pair in polygons.windows(2) {
        let (inner, outer) = (&pair[0], &pair[1]);
        if outer.time <= inner.time {
            return Err(HeatmapError::InvalidOrdering {
                source_id: source.clone(),
                message: format!(
                    "cutoff {} follows cutoff {}, expected strictly increasing times",
                    outer.time, inner.time
                ),
            });
        }
        let inner_area = inner.geometry.unsigned_area();
        let outside = overlay
            .difference(&inner.geometry, &outer.geometry)?
            .unsigned_area();
        let allowed = inner_area * NESTING_AREA_TOLERANCE + geo_utils::EMPTY_AREA_TOLERANCE;
        if outside > allowed {
            return Err(HeatmapError::InvalidOrdering {
                source_id: source.clone(),
                message: format!(
                    "polygon for cutoff {} leaves area {outside} of the polygon for cutoff {} uncovered",
                    outer.time, inner.time
                ),
            });
        }
    }
    Ok(())
}
