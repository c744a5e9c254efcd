use serde::{Deserialize, Serialize};

/// an evenly spaced list of isochrone cutoff times, in minutes, from
/// `min_minutes` to `max_minutes` inclusive.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CutoffRange {
    pub min_minutes: u64,
    pub max_minutes: u64,
    pub step_minutes: u64,
}

impl CutoffRange {
    pub fn new(min_minutes: u64, max_minutes: u64, step_minutes: u64) -> CutoffRange {
        CutoffRange {
            min_minutes,
            max_minutes,
            step_minutes,
        }
    }

    /// expands the range into cutoff times in minutes
    pub fn cutoffs_minutes(&self) -> Result<Vec<u64>, String> {
        if self.step_minutes == 0 {
            return Err(String::from("cutoff step must be strictly positive"));
        }
        if self.min_minutes == 0 {
            return Err(String::from(
                "minimum cutoff must be at least 1 minute, a 0 minute isochrone has no area",
            ));
        }
        if self.max_minutes < self.min_minutes {
            return Err(format!(
                "maximum cutoff {} is below minimum cutoff {}",
                self.max_minutes, self.min_minutes
            ));
        }
        let cutoffs = (self.min_minutes..=self.max_minutes)
            .step_by(self.step_minutes as usize)
            .collect();
        Ok(cutoffs)
    }

    /// expands the range into cutoff times in seconds, as expected by routers
    pub fn cutoffs_seconds(&self) -> Result<Vec<u64>, String> {
        let minutes = self.cutoffs_minutes()?;
        Ok(minutes.into_iter().map(|m| m * 60).collect())
    }
}
