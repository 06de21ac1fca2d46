mod extract;
pub mod geometry;
pub mod types;

pub use extract::{MetricsExtractor, DEFAULT_MIN_VISIBILITY, MIN_SHOULDER_WIDTH};
pub use types::{Feature, PostureMetrics, ANGLE_RELATIVE_FLOOR_DEG};
