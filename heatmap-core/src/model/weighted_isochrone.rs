use itertools::Itertools;

use super::{SourceId, TimeBand};

/// a collection of disjoint time bands that together describe one accessibility estimate,
/// along with the sources that were averaged into it.
#[derive(Clone, Debug, Default)]
pub struct WeightedIsochrone {
    bands: Vec<TimeBand>,
    sources: Vec<SourceId>,
}

impl WeightedIsochrone {
    pub fn new(bands: Vec<TimeBand>, sources: Vec<SourceId>) -> WeightedIsochrone {
        WeightedIsochrone { bands, sources }
    }

    /// an isochrone built from a single (address, direction) source
    pub fn from_source(source: SourceId, bands: Vec<TimeBand>) -> WeightedIsochrone {
        WeightedIsochrone {
            bands,
            sources: vec![source],
        }
    }

    pub fn bands(&self) -> &[TimeBand] {
        &self.bands
    }

    pub fn sources(&self) -> &[SourceId] {
        &self.sources
    }

    pub fn into_parts(self) -> (Vec<TimeBand>, Vec<SourceId>) {
        (self.bands, self.sources)
    }

    /// number of source isochrones averaged into this one. this is the total weight
    /// carried by the isochrone and is conserved across merges.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn total_area(&self) -> f64 {
        self.bands.iter().map(TimeBand::area).sum()
    }

    /// mean travel time over the covered area, weighting each band by its area.
    /// None when the isochrone covers no area.
    pub fn area_weighted_mean_time(&self) -> Option<f64> {
        let (weighted, area) = self.bands.iter().fold((0.0, 0.0), |(w, a), band| {
            let band_area = band.area();
            (w + band.time * band_area, a + band_area)
        });
        if area > 0.0 {
            Some(weighted / area)
        } else {
            None
        }
    }

    /// short description of the sources, used in diagnostics
    pub fn label(&self) -> String {
        self.sources.iter().map(|s| s.to_string()).join(", ")
    }
}
