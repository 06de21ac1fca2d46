use super::drift::{check_drift, DriftReport};
use super::profile::{CalibrationProfile, PoseKind};
use crate::clock::{Clock, SystemClock};
use crate::error::{PostureError, StorageError};
use crate::metrics::{Feature, PostureMetrics};
use crate::storage::ProfileStorage;

/// Well-known storage key for the calibration profile
pub const PROFILE_KEY: &str = "posture-calibration";

/// About 2 seconds of frames
pub const DEFAULT_CALIBRATION_FRAMES: usize = 60;

/// About 6 seconds of frames, used by the guided calibration flow
pub const GUIDED_CALIBRATION_FRAMES: usize = 180;

/// Progress of an active calibration pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationProgress {
    pub pose: PoseKind,
    pub collected: usize,
    pub required: usize,
    /// 0-100
    pub percent: f64,
    /// The baseline for `pose` was stored by this frame
    pub finished: bool,
}

/// Collects reference postures and persists them
pub struct CalibrationStore<S: ProfileStorage> {
    storage: S,
    profile: CalibrationProfile,
    required_frames: usize,
    collecting: Option<PoseKind>,
    frames: Vec<PostureMetrics>,
}

impl<S: ProfileStorage> CalibrationStore<S> {
    pub fn new(storage: S, identity: impl Into<String>) -> Self {
        Self {
            storage,
            profile: CalibrationProfile::new(identity, SystemClock.now_ms()),
            required_frames: DEFAULT_CALIBRATION_FRAMES,
            collecting: None,
            frames: Vec::with_capacity(DEFAULT_CALIBRATION_FRAMES),
        }
    }

    /// Change how many frames each pass collects (at least one)
    pub fn with_required_frames(mut self, required_frames: usize) -> Self {
        self.required_frames = required_frames.max(1);
        self
    }

    /// Start collecting frames for `pose`, discarding any pass in progress
    pub fn begin(&mut self, pose: PoseKind) {
        if let Some(previous) = self.collecting {
            tracing::debug!(
                "Restarting calibration ({} pass had {} frames)",
                previous,
                self.frames.len()
            );
        }

        tracing::info!(
            "Calibrating {} posture over {} frames",
            pose,
            self.required_frames
        );

        self.frames.clear();
        self.collecting = Some(pose);
    }

    /// Add one frame to the active pass
    ///
    /// Returns `None` when idle or when the frame has no metrics. The pass
    /// finalizes itself once the required number of frames is reached.
    pub fn add_frame(&mut self, metrics: Option<&PostureMetrics>) -> Option<CalibrationProgress> {
        let pose = self.collecting?;
        let metrics = metrics?;

        self.frames.push(*metrics);
        let collected = self.frames.len();

        let finished = if collected >= self.required_frames {
            match self.finish() {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Calibration finalize failed: {}", e);
                    false
                }
            }
        } else {
            false
        };

        Some(CalibrationProgress {
            pose,
            collected,
            required: self.required_frames,
            percent: percent(collected, self.required_frames),
            finished,
        })
    }

    /// Finalize the active pass with whatever has been collected
    ///
    /// Fails with `EmptyCalibration` when no frames were collected.
    pub fn finish(&mut self) -> Result<PostureMetrics, PostureError> {
        let baseline = average_metrics(&self.frames)?;
        let pose = self.collecting.ok_or(PostureError::EmptyCalibration)?;

        tracing::info!(
            "Stored {} posture baseline from {} frames",
            pose,
            self.frames.len()
        );
        tracing::debug!("{} baseline: {:?}", pose, baseline);

        self.profile.set_baseline(pose, baseline);
        self.collecting = None;
        self.frames.clear();

        Ok(baseline)
    }

    /// Percent of the active pass collected, 0 when idle
    pub fn progress(&self) -> f64 {
        match self.collecting {
            Some(_) => percent(self.frames.len(), self.required_frames),
            None => 0.0,
        }
    }

    pub fn collecting(&self) -> Option<PoseKind> {
        self.collecting
    }

    pub fn is_complete(&self) -> bool {
        self.profile.is_complete()
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Persist the current profile
    pub fn save(&mut self) -> Result<(), PostureError> {
        let value = serde_json::to_value(&self.profile).map_err(StorageError::from)?;
        self.storage.set(PROFILE_KEY, value)?;

        tracing::info!("Saved calibration for '{}'", self.profile.identity);
        Ok(())
    }

    /// Load the stored profile for `identity`
    ///
    /// Missing data, data for another identity and unparsable data are all
    /// reported as `ProfileNotFound`.
    pub fn load(&mut self, identity: &str) -> Result<&CalibrationProfile, PostureError> {
        let not_found = || PostureError::ProfileNotFound {
            identity: identity.to_string(),
        };

        let value = self.storage.get(PROFILE_KEY).ok_or_else(not_found)?;

        let profile: CalibrationProfile = match serde_json::from_value(value) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Ignoring corrupt calibration profile: {}", e);
                return Err(not_found());
            }
        };

        if profile.identity != identity {
            tracing::debug!(
                "Stored calibration belongs to '{}', not '{}'",
                profile.identity,
                identity
            );
            return Err(not_found());
        }

        tracing::info!(
            "Loaded calibration for '{}' (complete={})",
            identity,
            profile.is_complete()
        );

        self.profile = profile;
        self.collecting = None;
        self.frames.clear();
        Ok(&self.profile)
    }

    /// Erase the profile from memory and storage
    pub fn clear(&mut self) {
        let identity = std::mem::take(&mut self.profile.identity);
        self.profile = CalibrationProfile::new(identity, SystemClock.now_ms());
        self.collecting = None;
        self.frames.clear();
        self.storage.remove(PROFILE_KEY);

        tracing::info!("Cleared calibration for '{}'", self.profile.identity);
    }

    /// Check whether the good-posture baseline still matches `sample`
    pub fn check_drift(&self, sample: &PostureMetrics, tolerance: f64) -> DriftReport {
        check_drift(self.profile.good_posture.as_ref(), sample, tolerance)
    }
}

/// Mean of every feature across `frames`; the timestamp is the last frame's
pub fn average_metrics(frames: &[PostureMetrics]) -> Result<PostureMetrics, PostureError> {
    let last = frames.last().ok_or(PostureError::EmptyCalibration)?;

    let mut mean = PostureMetrics {
        timestamp_ms: last.timestamp_ms,
        ..PostureMetrics::default()
    };

    // Running mean keeps identical samples exact
    for (i, frame) in frames.iter().enumerate() {
        let n = (i + 1) as f64;
        for feature in Feature::ALL {
            let current = mean.get(feature);
            mean.set(feature, current + (frame.get(feature) - current) / n);
        }
    }

    Ok(mean)
}

fn percent(collected: usize, required: usize) -> f64 {
    (collected as f64 / required as f64 * 100.0).min(100.0)
}
