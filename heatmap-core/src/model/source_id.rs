use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::TravelDirection;

/// identifies the (address, direction) pair that a cumulative isochrone
/// sequence was computed for.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceId {
    pub address: String,
    pub direction: TravelDirection,
}

impl SourceId {
    pub fn new(address: &str, direction: TravelDirection) -> SourceId {
        SourceId {
            address: address.to_string(),
            direction,
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' ({})", self.address, self.direction)
    }
}
