use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{BooleanOps, CoordsIter, MultiPolygon};

use super::{GeometryOverlay, OverlayOperation};
use crate::error::HeatmapError;

/// overlay backed by the boolean operations of the `geo` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoBooleanOverlay;

impl GeometryOverlay for GeoBooleanOverlay {
    fn overlay(
        &self,
        subject: &MultiPolygon<f64>,
        clip: &MultiPolygon<f64>,
        operation: OverlayOperation,
    ) -> Result<MultiPolygon<f64>, HeatmapError> {
        if subject.0.is_empty() {
            return match operation {
                OverlayOperation::Union => Ok(clip.clone()),
                _ => Ok(MultiPolygon::new(vec![])),
            };
        }
        if clip.0.is_empty() {
            return match operation {
                OverlayOperation::Difference | OverlayOperation::Union => Ok(subject.clone()),
                OverlayOperation::Intersection => Ok(MultiPolygon::new(vec![])),
            };
        }

        // backend panics become GeometryOperation errors
        let result = catch_unwind(AssertUnwindSafe(|| match operation {
            OverlayOperation::Difference => subject.difference(clip),
            OverlayOperation::Intersection => subject.intersection(clip),
            OverlayOperation::Union => subject.union(clip),
        }))
        .map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| String::from("unknown panic"));
            HeatmapError::GeometryOperation(format!("polygon {operation} failed: {reason}"))
        })?;

        if result
            .coords_iter()
            .any(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(HeatmapError::GeometryOperation(format!(
                "polygon {operation} produced non-finite coordinates"
            )));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::GeoBooleanOverlay;
    use crate::overlay::GeometryOverlay;
    use approx::assert_relative_eq;
    use geo::{Area, MultiPolygon, Rect};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Rect::new((x0, y0), (x1, y1)).to_polygon()])
    }

    #[test]
    fn test_intersection_of_overlapping_squares() {
        let result = GeoBooleanOverlay
            .intersection(&square(0.0, 0.0, 2.0, 2.0), &square(1.0, 1.0, 3.0, 3.0))
            .unwrap();
        assert_relative_eq!(result.unsigned_area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intersection_of_disjoint_squares_is_empty() {
        let result = GeoBooleanOverlay
            .intersection(&square(0.0, 0.0, 1.0, 1.0), &square(5.0, 5.0, 6.0, 6.0))
            .unwrap();
        assert_relative_eq!(result.unsigned_area(), 0.0);
    }

    #[test]
    fn test_difference_leaves_annulus() {
        let result = GeoBooleanOverlay
            .difference(&square(0.0, 0.0, 4.0, 4.0), &square(1.0, 1.0, 3.0, 3.0))
            .unwrap();
        assert_relative_eq!(result.unsigned_area(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_of_overlapping_squares() {
        let result = GeoBooleanOverlay
            .union(&square(0.0, 0.0, 2.0, 2.0), &square(1.0, 1.0, 3.0, 3.0))
            .unwrap();
        assert_relative_eq!(result.unsigned_area(), 7.0, epsilon = 1e-9);
        let from_empty = GeoBooleanOverlay
            .union(&MultiPolygon::new(vec![]), &square(0.0, 0.0, 2.0, 2.0))
            .unwrap();
        assert_eq!(from_empty, square(0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn test_difference_with_empty_clip_is_subject() {
        let subject = square(0.0, 0.0, 4.0, 4.0);
        let result = GeoBooleanOverlay
            .difference(&subject, &MultiPolygon::new(vec![]))
            .unwrap();
        assert_eq!(result, subject);
    }
}
