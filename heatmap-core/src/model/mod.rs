mod raw_cumulative_sequence;
mod source_id;
mod time_band;
mod time_unit;
mod travel_direction;
mod weighted_isochrone;

pub use raw_cumulative_sequence::{CumulativePolygon, RawCumulativeSequence};
pub use source_id::SourceId;
pub use time_band::TimeBand;
pub use time_unit::TimeUnit;
pub use travel_direction::TravelDirection;
pub use weighted_isochrone::WeightedIsochrone;
