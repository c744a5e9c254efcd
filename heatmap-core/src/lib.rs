pub mod algorithm;
pub mod error;
pub mod model;
pub mod overlay;
pub mod util;
