use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    difference_rings, ConcurrentReductionScheduler, EmptyMergePolicy, PairwiseOverlayReducer,
    ReductionSummary,
};
use crate::{
    error::HeatmapError,
    model::{RawCumulativeSequence, WeightedIsochrone},
    overlay::GeometryOverlay,
};

/// parameters of an aggregation run
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AggregationOptions {
    /// number of reduction workers. defaults to the available hardware parallelism.
    pub workers: Option<usize>,
    #[serde(default)]
    pub empty_merge_policy: EmptyMergePolicy,
}

/// combines the raw cumulative isochrones of every (address, direction) pair into a single
/// weighted-average isochrone.
///
/// ring differencing runs independently per sequence in parallel. the resulting isochrones
/// are then reduced to one by the concurrent reduction scheduler.
pub fn aggregate(
    raw_sequences: Vec<RawCumulativeSequence>,
    overlay: &dyn GeometryOverlay,
    options: &AggregationOptions,
) -> Result<(WeightedIsochrone, ReductionSummary), HeatmapError> {
    if raw_sequences.is_empty() {
        return Err(HeatmapError::EmptyInput);
    }
    let isochrones = raw_sequences
        .into_par_iter()
        .map(|sequence| difference_rings(sequence, overlay))
        .collect::<Result<Vec<_>, _>>()?;
    reduce(isochrones, overlay, options)
}

/// reduces already-differenced isochrones into one.
pub fn reduce(
    isochrones: Vec<WeightedIsochrone>,
    overlay: &dyn GeometryOverlay,
    options: &AggregationOptions,
) -> Result<(WeightedIsochrone, ReductionSummary), HeatmapError> {
    let reducer = PairwiseOverlayReducer::new(overlay, options.empty_merge_policy);
    let scheduler = ConcurrentReductionScheduler::new(reducer, options.workers);
    scheduler.reduce(isochrones)
}
