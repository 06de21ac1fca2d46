mod drift;
mod profile;
mod store;

pub use drift::{check_drift, DriftReport, DEFAULT_DRIFT_TOLERANCE};
pub(crate) use drift::relative_deviation;
pub use profile::{CalibrationProfile, PoseKind};
pub use store::{
    average_metrics, CalibrationProgress, CalibrationStore, DEFAULT_CALIBRATION_FRAMES,
    GUIDED_CALIBRATION_FRAMES, PROFILE_KEY,
};
