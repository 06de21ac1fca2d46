use super::geometry::{angle_at, midpoint, planar_distance};
use super::types::{Feature, PostureMetrics};
use crate::error::PostureError;
use crate::landmarks::{Landmark, LandmarkSet, Point};

/// Shoulder widths below this are treated as a failed detection
pub const MIN_SHOULDER_WIDTH: f64 = 1e-4;

/// Default visibility below which a landmark counts as missing
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// Converts landmark sets into posture metrics
#[derive(Debug, Clone, Copy)]
pub struct MetricsExtractor {
    min_visibility: f64,
}

impl MetricsExtractor {
    pub fn new(min_visibility: f64) -> Self {
        Self { min_visibility }
    }

    /// Derive the posture features for one frame
    ///
    /// Fails with `InputDegenerate` when a required landmark is missing, not
    /// visible enough or non-finite, when the shoulders collapse onto each
    /// other, or when a derived feature overflows.
    pub fn extract(&self, set: &LandmarkSet) -> Result<PostureMetrics, PostureError> {
        let nose = self.require(set.nose, "nose")?;
        let left_shoulder = self.require(set.left_shoulder, "left shoulder")?;
        let right_shoulder = self.require(set.right_shoulder, "right shoulder")?;
        let left_hip = self.require(set.left_hip, "left hip")?;
        let right_hip = self.require(set.right_hip, "right hip")?;
        let left_ear = self.require(set.left_ear, "left ear")?;
        let right_ear = self.require(set.right_ear, "right ear")?;

        let shoulder_width = planar_distance(left_shoulder, right_shoulder);
        if !shoulder_width.is_finite() || shoulder_width < MIN_SHOULDER_WIDTH {
            return Err(PostureError::InputDegenerate(format!(
                "shoulder width {:.6} is too small",
                shoulder_width
            )));
        }

        let shoulder_mid = midpoint(left_shoulder, right_shoulder);
        let hip_mid = midpoint(left_hip, right_hip);
        let ear_mid = midpoint(left_ear, right_ear);

        // Straight up from the hips (y grows downward), so upright reads 0°
        let above_hip = Point::new(hip_mid.x, hip_mid.y - 1.0, hip_mid.z);

        let metrics = PostureMetrics {
            head_shoulder_ratio: planar_distance(ear_mid, shoulder_mid) / shoulder_width,
            shoulder_asymmetry: (left_shoulder.y - right_shoulder.y).abs() / shoulder_width,
            torso_angle: angle_at(shoulder_mid, hip_mid, above_hip),
            neck_angle: angle_at(shoulder_mid, ear_mid, nose),
            forward_lean: (shoulder_mid.z - hip_mid.z).abs(),
            shoulder_width,
            timestamp_ms: set.timestamp_ms,
        };

        if let Some(feature) = Feature::ALL
            .into_iter()
            .find(|&feature| !metrics.get(feature).is_finite())
        {
            return Err(PostureError::InputDegenerate(format!(
                "{} is not finite",
                feature
            )));
        }

        Ok(metrics)
    }

    fn require(&self, landmark: Option<Landmark>, name: &str) -> Result<Point, PostureError> {
        match landmark {
            Some(landmark) if !landmark.point.is_finite() => Err(PostureError::InputDegenerate(
                format!("{} has non-finite coordinates", name),
            )),
            Some(landmark) if landmark.is_visible(self.min_visibility) => Ok(landmark.point),
            Some(_) => Err(PostureError::InputDegenerate(format!("{} is not visible", name))),
            None => Err(PostureError::InputDegenerate(format!("{} is missing", name))),
        }
    }
}

impl Default for MetricsExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_VISIBILITY)
    }
}
