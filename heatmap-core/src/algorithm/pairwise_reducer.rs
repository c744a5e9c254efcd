use super::EmptyMergePolicy;
use crate::{
    error::HeatmapError,
    model::{TimeBand, WeightedIsochrone},
    overlay::GeometryOverlay,
    util::geo_utils::{self, EnvelopeIndex},
};

/// merges two weighted isochrones into one by intersecting every band of one with every
/// band of the other. each non-empty intersection becomes a band whose time is the
/// divider-weighted average of its two parent bands.
pub struct PairwiseOverlayReducer<'a> {
    overlay: &'a dyn GeometryOverlay,
    policy: EmptyMergePolicy,
}

impl<'a> PairwiseOverlayReducer<'a> {
    pub fn new(overlay: &'a dyn GeometryOverlay, policy: EmptyMergePolicy) -> Self {
        Self { overlay, policy }
    }

    pub fn policy(&self) -> EmptyMergePolicy {
        self.policy
    }

    /// merges two isochrones, consuming both.
    ///
    /// band pairs whose bounding boxes do not overlap cannot intersect and are skipped.
    /// when no pair of bands overlaps at all, the configured EmptyMergePolicy decides
    /// between failing and carrying both inputs forward unaveraged.
    ///
    /// # Arguments
    ///
    /// * `left` - first isochrone
    /// * `right` - second isochrone
    ///
    /// # Returns
    ///
    /// the merged isochrone, which carries the sources of both inputs
    pub fn merge(
        &self,
        left: WeightedIsochrone,
        right: WeightedIsochrone,
    ) -> Result<WeightedIsochrone, HeatmapError> {
        let index = EnvelopeIndex::new(right.bands().iter().map(|b| &b.geometry));
        let mut bands: Vec<TimeBand> = Vec::new();
        for a in left.bands() {
            for idx in index.candidates(&a.geometry) {
                let b = right.bands().get(idx).ok_or_else(|| {
                    HeatmapError::InternalError(format!(
                        "envelope index returned band {idx} for isochrone with {} bands",
                        right.len()
                    ))
                })?;
                let overlap = self.overlay.intersection(&a.geometry, &b.geometry)?;
                if geo_utils::is_degenerate(&overlap) {
                    continue;
                }
                bands.push(TimeBand::averaged(overlap, a, b));
            }
        }

        if bands.is_empty() {
            match self.policy {
                EmptyMergePolicy::Fail => {
                    return Err(HeatmapError::EmptyMergeInconsistency {
                        left: left.label(),
                        right: right.label(),
                    });
                }
                EmptyMergePolicy::CarryForward => {
                    log::warn!(
                        "isochrones [{}] and [{}] share no area, carrying both forward",
                        left.label(),
                        right.label()
                    );
                }
            }
        }

        let (left_bands, mut sources) = left.into_parts();
        let (right_bands, right_sources) = right.into_parts();
        if bands.is_empty() {
            bands = left_bands;
            bands.extend(right_bands);
        }
        sources.extend(right_sources);
        Ok(WeightedIsochrone::new(bands, sources))
    }
}

#[cfg(test)]
mod tests {
    use super::PairwiseOverlayReducer;
    use crate::algorithm::EmptyMergePolicy;
    use crate::error::HeatmapError;
    use crate::model::{SourceId, TimeBand, TravelDirection, WeightedIsochrone};
    use crate::overlay::GeoBooleanOverlay;
    use approx::assert_relative_eq;
    use geo::{BoundingRect, MultiPolygon, Rect};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Rect::new((x0, y0), (x1, y1)).to_polygon()])
    }

    fn single(name: &str, geometry: MultiPolygon<f64>, time: f64) -> WeightedIsochrone {
        WeightedIsochrone::from_source(
            SourceId::new(name, TravelDirection::From),
            vec![TimeBand::new(geometry, time)],
        )
    }

    #[test]
    fn test_overlapping_squares_average_times() {
        let reducer = PairwiseOverlayReducer::new(&GeoBooleanOverlay, EmptyMergePolicy::Fail);
        let a = single("a", square(0.0, 0.0, 2.0, 2.0), 10.0);
        let b = single("b", square(1.0, 1.0, 3.0, 3.0), 20.0);
        let merged = reducer.merge(a, b).unwrap();

        assert_eq!(merged.len(), 1);
        let band = &merged.bands()[0];
        assert_relative_eq!(band.time, 15.0);
        assert_eq!(band.divider, 2);
        assert_relative_eq!(band.area(), 1.0, epsilon = 1e-9);
        let rect = band.geometry.bounding_rect().unwrap();
        assert_relative_eq!(rect.min().x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(rect.min().y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(rect.max().x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(rect.max().y, 2.0, epsilon = 1e-9);
        assert_eq!(merged.source_count(), 2);
    }

    #[test]
    fn test_existing_dividers_weight_the_average() {
        let reducer = PairwiseOverlayReducer::new(&GeoBooleanOverlay, EmptyMergePolicy::Fail);
        let heavy = WeightedIsochrone::new(
            vec![TimeBand {
                geometry: square(0.0, 0.0, 2.0, 2.0),
                time: 10.0,
                divider: 3,
            }],
            vec![
                SourceId::new("a", TravelDirection::From),
                SourceId::new("a", TravelDirection::To),
                SourceId::new("b", TravelDirection::From),
            ],
        );
        let light = single("b", square(0.0, 0.0, 2.0, 2.0), 30.0);
        let merged = reducer.merge(heavy, light).unwrap();
        assert_relative_eq!(merged.bands()[0].time, 15.0);
        assert_eq!(merged.bands()[0].divider, 4);
        assert_eq!(merged.source_count(), 4);
    }

    #[test]
    fn test_multi_band_merge_partitions_overlap() {
        let reducer = PairwiseOverlayReducer::new(&GeoBooleanOverlay, EmptyMergePolicy::Fail);
        let a = WeightedIsochrone::from_source(
            SourceId::new("a", TravelDirection::From),
            vec![
                TimeBand::new(square(0.0, 0.0, 1.0, 2.0), 10.0),
                TimeBand::new(square(1.0, 0.0, 2.0, 2.0), 20.0),
            ],
        );
        let b = WeightedIsochrone::from_source(
            SourceId::new("b", TravelDirection::From),
            vec![
                TimeBand::new(square(0.0, 0.0, 2.0, 1.0), 30.0),
                TimeBand::new(square(0.0, 1.0, 2.0, 2.0), 40.0),
            ],
        );
        let merged = reducer.merge(a, b).unwrap();
        assert_eq!(merged.len(), 4);
        assert_relative_eq!(merged.total_area(), 4.0, epsilon = 1e-9);
        let mut times = merged.bands().iter().map(|b| b.time).collect::<Vec<_>>();
        times.sort_by(|x, y| x.total_cmp(y));
        assert_eq!(times, vec![20.0, 25.0, 25.0, 30.0]);
    }

    #[test]
    fn test_disjoint_merge_fails_by_default() {
        let reducer = PairwiseOverlayReducer::new(&GeoBooleanOverlay, EmptyMergePolicy::Fail);
        let a = single("a", square(0.0, 0.0, 1.0, 1.0), 10.0);
        let b = single("b", square(5.0, 5.0, 6.0, 6.0), 20.0);
        match reducer.merge(a, b) {
            Err(HeatmapError::EmptyMergeInconsistency { left, right }) => {
                assert_eq!(left, "'a' (from)");
                assert_eq!(right, "'b' (from)");
            }
            other => panic!("expected empty merge error, found {other:?}"),
        }
    }

    #[test]
    fn test_disjoint_merge_carries_forward() {
        let reducer =
            PairwiseOverlayReducer::new(&GeoBooleanOverlay, EmptyMergePolicy::CarryForward);
        let a = single("a", square(0.0, 0.0, 1.0, 1.0), 10.0);
        let b = single("b", square(5.0, 5.0, 6.0, 6.0), 20.0);
        let merged = reducer.merge(a, b).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.source_count(), 2);
        assert!(merged.bands().iter().all(|b| b.divider == 1));
    }

    #[test]
    fn test_edge_contact_is_not_overlap() {
        let reducer = PairwiseOverlayReducer::new(&GeoBooleanOverlay, EmptyMergePolicy::Fail);
        let a = single("a", square(0.0, 0.0, 1.0, 1.0), 10.0);
        let b = single("b", square(1.0, 0.0, 2.0, 1.0), 20.0);
        assert!(reducer.merge(a, b).is_err());
    }
}
