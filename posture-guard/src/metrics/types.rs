use serde::{Deserialize, Serialize};
use std::fmt;

/// Degrees an angle feature is measured against when its baseline is smaller
pub const ANGLE_RELATIVE_FLOOR_DEG: f64 = 10.0;

/// Scale and camera invariant posture features derived from one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureMetrics {
    /// Ear-midpoint to shoulder-midpoint distance over shoulder width
    pub head_shoulder_ratio: f64,
    /// Vertical shoulder offset over shoulder width
    pub shoulder_asymmetry: f64,
    /// Degrees from vertical, 0 when upright
    pub torso_angle: f64,
    /// Degrees, 0-180
    pub neck_angle: f64,
    /// Depth difference between shoulder and hip midpoints
    pub forward_lean: f64,
    /// Scale reference only
    pub shoulder_width: f64,
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl PostureMetrics {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::HeadShoulderRatio => self.head_shoulder_ratio,
            Feature::ShoulderAsymmetry => self.shoulder_asymmetry,
            Feature::TorsoAngle => self.torso_angle,
            Feature::NeckAngle => self.neck_angle,
            Feature::ForwardLean => self.forward_lean,
            Feature::ShoulderWidth => self.shoulder_width,
        }
    }

    fn get_mut(&mut self, feature: Feature) -> &mut f64 {
        match feature {
            Feature::HeadShoulderRatio => &mut self.head_shoulder_ratio,
            Feature::ShoulderAsymmetry => &mut self.shoulder_asymmetry,
            Feature::TorsoAngle => &mut self.torso_angle,
            Feature::NeckAngle => &mut self.neck_angle,
            Feature::ForwardLean => &mut self.forward_lean,
            Feature::ShoulderWidth => &mut self.shoulder_width,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        *self.get_mut(feature) = value;
    }
}

/// Named scalar features of `PostureMetrics`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    HeadShoulderRatio,
    ShoulderAsymmetry,
    TorsoAngle,
    NeckAngle,
    ForwardLean,
    ShoulderWidth,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::HeadShoulderRatio,
        Feature::ShoulderAsymmetry,
        Feature::TorsoAngle,
        Feature::NeckAngle,
        Feature::ForwardLean,
        Feature::ShoulderWidth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::HeadShoulderRatio => "headShoulderRatio",
            Self::ShoulderAsymmetry => "shoulderAsymmetry",
            Self::TorsoAngle => "torsoAngle",
            Self::NeckAngle => "neckAngle",
            Self::ForwardLean => "forwardLean",
            Self::ShoulderWidth => "shoulderWidth",
        }
    }

    /// Smallest denominator used when expressing a change as a fraction
    /// of the baseline. Angles rest near 0° when upright.
    pub fn relative_floor(&self) -> f64 {
        match self {
            Self::TorsoAngle | Self::NeckAngle => ANGLE_RELATIVE_FLOOR_DEG,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
