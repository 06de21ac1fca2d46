mod baseline;
mod calibrated;
pub mod config;
mod strategy;
pub mod types;

pub use baseline::classify_drift;
pub use calibrated::classify_calibrated;
pub use config::{CalibratedThresholds, ClassifierConfig, DriftThresholds, FeatureWeights};
pub use strategy::PostureClassifier;
pub use types::{PostureIssue, Severity, Strategy, Verdict};
