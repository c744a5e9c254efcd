use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// whether an isochrone describes trips leaving an address or trips arriving at it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    /// reachable when departing from the address
    From,
    /// able to reach the address
    To,
}

impl TravelDirection {
    pub const ALL: [TravelDirection; 2] = [TravelDirection::From, TravelDirection::To];
}

impl Display for TravelDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelDirection::From => write!(f, "from"),
            TravelDirection::To => write!(f, "to"),
        }
    }
}
