use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// the polygon boolean operations the aggregation engine needs from a geometry backend
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverlayOperation {
    Difference,
    Intersection,
    Union,
}

impl Display for OverlayOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayOperation::Difference => write!(f, "difference"),
            OverlayOperation::Intersection => write!(f, "intersection"),
            OverlayOperation::Union => write!(f, "union"),
        }
    }
}
