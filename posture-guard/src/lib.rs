pub mod calibration;
pub mod classifier;
pub mod clock;
pub mod error;
pub mod landmarks;
pub mod metrics;
pub mod monitor;
pub mod storage;

pub use calibration::{CalibrationProfile, CalibrationStore, DriftReport, PoseKind};
pub use classifier::{PostureClassifier, Severity, Strategy, Verdict};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PostureError, StorageError};
pub use landmarks::{DetectorFrame, FrameSource, Landmark, LandmarkSet};
pub use metrics::{MetricsExtractor, PostureMetrics};
pub use monitor::{MonitorConfig, PostureListener, Sensitivity, SessionMonitor, SessionStats};
pub use storage::{FileStorage, MemoryStorage, ProfileStorage};
