use crate::calibration::DriftReport;
use crate::classifier::{PostureIssue, Severity, Verdict};
use serde::{Deserialize, Serialize};

/// Raised once when a slouch has lasted long enough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlouchEvent {
    pub issues: Vec<PostureIssue>,
    pub severity: Severity,
    /// Time since the slouch streak began
    pub duration_ms: u64,
    pub deviation: f64,
    pub at_ms: u64,
}

impl SlouchEvent {
    pub fn reasons(&self) -> Vec<&'static str> {
        self.issues.iter().map(PostureIssue::description).collect()
    }
}

/// Which reference a drift check compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    Calibration,
    Session,
}

/// Periodic re-evaluation of the reference posture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftCheckEvent {
    pub report: DriftReport,
    pub source: BaselineSource,
    pub at_ms: u64,
}

/// Posture state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    SlouchDetected(SlouchEvent),
    PostureCorrected,
}

/// Result of a processed frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub verdict: Verdict,
    pub event: Option<MonitorEvent>,
    pub drift_check: Option<DriftCheckEvent>,
}

/// Receives monitor notifications on the frame-processing thread
pub trait PostureListener {
    fn on_slouch_detected(&mut self, event: &SlouchEvent);

    fn on_posture_corrected(&mut self);

    /// Called whenever the periodic drift check runs
    fn on_drift_check(&mut self, _event: &DriftCheckEvent) {
        // Default implementation: drift checks are informational
    }
}
