mod geo_boolean_overlay;
mod geometry_overlay;
mod overlay_operation;

pub use geo_boolean_overlay::GeoBooleanOverlay;
pub use geometry_overlay::GeometryOverlay;
pub use overlay_operation::OverlayOperation;
