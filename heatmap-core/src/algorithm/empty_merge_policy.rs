use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// what to do when two isochrones being merged share no reachable area.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyMergePolicy {
    /// abort the aggregation with an EmptyMergeInconsistency error
    #[default]
    Fail,
    /// keep the bands of both isochrones as they are, without averaging
    CarryForward,
}

impl Display for EmptyMergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyMergePolicy::Fail => write!(f, "fail"),
            EmptyMergePolicy::CarryForward => write!(f, "carry_forward"),
        }
    }
}
