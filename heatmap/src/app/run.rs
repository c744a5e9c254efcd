use std::sync::{Arc, Mutex};

use geo::Point;
use heatmap_core::{
    algorithm::{self, difference_rings, ReductionSummary},
    model::{SourceId, WeightedIsochrone},
    overlay::GeoBooleanOverlay,
};
use itertools::Itertools;
use kdam::{Bar, BarExt};
use rayon::prelude::*;

use super::HeatmapAppError;
use crate::{
    collaborator::{Geocoder, IsochroneProvider},
    config::HeatmapConfiguration,
};

/// the result of a heatmap run
#[derive(Debug)]
pub struct HeatmapRun {
    pub isochrone: WeightedIsochrone,
    pub summary: ReductionSummary,
}

/// computes the average commute isochrone over every configured address and direction.
///
/// # Arguments
/// * `config` - run configuration
/// * `geocoder` - resolves addresses that are not given as coordinates
/// * `provider` - computes the cumulative isochrones of each (address, direction) pair
///
/// # Result
/// the aggregated isochrone, or the first error encountered. no partial result is produced.
pub fn run(
    config: &HeatmapConfiguration,
    geocoder: &dyn Geocoder,
    provider: &dyn IsochroneProvider,
) -> Result<HeatmapRun, HeatmapAppError> {
    config.validate()?;
    let origins = resolve_locations(config, geocoder)?;

    let tasks = origins
        .iter()
        .cartesian_product(config.directions.iter())
        .map(|((address, point), direction)| (SourceId::new(address, *direction), *point))
        .collect_vec();
    log::info!(
        "computing isochrones for {} addresses and {} directions",
        origins.len(),
        config.directions.len()
    );

    let bar = Arc::new(Mutex::new(
        Bar::builder()
            .desc("fetch isochrones")
            .total(tasks.len())
            .build()
            .map_err(|e| {
                HeatmapAppError::ConfigurationError(format!("error building progress bar: {e}"))
            })?,
    ));
    let isochrones = tasks
        .into_par_iter()
        .map(|(source, origin)| -> Result<WeightedIsochrone, HeatmapAppError> {
            let cutoffs = config.cutoffs_seconds(source.direction)?;
            let sequence = provider.fetch(&source, origin, &cutoffs)?;
            let isochrone = difference_rings(sequence, &GeoBooleanOverlay)?;
            if let Ok(mut b) = bar.lock() {
                let _ = b.update(1);
            }
            Ok(isochrone)
        })
        .collect::<Result<Vec<_>, _>>()?;
    eprintln!();

    let (isochrone, summary) =
        algorithm::reduce(isochrones, &GeoBooleanOverlay, &config.aggregation)?;
    match isochrone.area_weighted_mean_time() {
        Some(mean) => log::info!(
            "heatmap has {} bands from {} sources, mean travel time {mean:.1} minutes",
            isochrone.len(),
            isochrone.source_count()
        ),
        None => log::warn!("heatmap covers no area"),
    }
    Ok(HeatmapRun { isochrone, summary })
}

/// finds the coordinate of each configured location, geocoding those without one.
fn resolve_locations(
    config: &HeatmapConfiguration,
    geocoder: &dyn Geocoder,
) -> Result<Vec<(String, Point<f64>)>, HeatmapAppError> {
    config
        .locations
        .iter()
        .map(|location| {
            let point = match location.point() {
                Some(p) => p,
                None => geocoder.geocode(&location.address)?,
            };
            log::debug!(
                "'{}' located at ({}, {})",
                location.address,
                point.y(),
                point.x()
            );
            Ok((location.address.clone(), point))
        })
        .collect()
}
