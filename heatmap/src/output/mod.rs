mod heatmap_output_format;

pub use heatmap_output_format::HeatmapOutputFormat;
