mod heatmap_app_error;
mod run;

pub use heatmap_app_error::HeatmapAppError;
pub use run::{run, HeatmapRun};
