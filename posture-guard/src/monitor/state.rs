use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureState {
    #[default]
    Good,
    Slouched,
}

impl PostureState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Slouched => "slouched",
        }
    }
}

impl fmt::Display for PostureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Debouncer state, mutated once per processed frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorState {
    pub slouch_streak: u32,
    pub good_streak: u32,
    pub posture: PostureState,
    pub total_frames: u64,
    pub slouch_frames: u64,
    pub good_frames: u64,
    pub alert_count: u32,
    /// Set once a session has been started
    pub session_start_ms: Option<u64>,
    /// Set by `stop()`; freezes the session duration
    pub stopped_at_ms: Option<u64>,
    pub last_drift_check_ms: u64,
    /// Start of the current slouch streak
    pub slouch_started_ms: Option<u64>,
}

impl MonitorState {
    pub fn new(now_ms: u64) -> Self {
        Self {
            session_start_ms: Some(now_ms),
            last_drift_check_ms: now_ms,
            ..Default::default()
        }
    }

    /// Clear streaks and the alert flag, keeping cumulative counts
    pub fn reset_streaks(&mut self, now_ms: u64) {
        self.slouch_streak = 0;
        self.good_streak = 0;
        self.posture = PostureState::Good;
        self.slouch_started_ms = None;
        self.last_drift_check_ms = now_ms;
    }
}

/// Snapshot of a monitoring session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whole minutes since the session started
    pub duration_minutes: u64,
    /// Percent of frames with good posture, one decimal
    pub posture_quality: f64,
    pub alert_count: u32,
    pub state: PostureState,
    pub total_frames: u64,
    pub good_frames: u64,
    pub slouch_frames: u64,
}

/// `good / total * 100` rounded to one decimal, 0 for an empty session
pub fn posture_quality(good_frames: u64, total_frames: u64) -> f64 {
    if total_frames == 0 {
        return 0.0;
    }
    (good_frames as f64 / total_frames as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posture_quality_rounding() {
        assert_eq!(posture_quality(0, 0), 0.0);
        assert_eq!(posture_quality(1, 3), 33.3);
        assert_eq!(posture_quality(2, 3), 66.7);
        assert_eq!(posture_quality(10, 10), 100.0);
    }

    #[test]
    fn test_reset_streaks_keeps_totals() {
        let mut state = MonitorState::new(100);
        state.slouch_streak = 7;
        state.posture = PostureState::Slouched;
        state.total_frames = 9;
        state.alert_count = 1;

        state.reset_streaks(500);
        assert_eq!(state.slouch_streak, 0);
        assert_eq!(state.posture, PostureState::Good);
        assert_eq!(state.last_drift_check_ms, 500);
        assert_eq!(state.total_frames, 9);
        assert_eq!(state.alert_count, 1);
    }
}
