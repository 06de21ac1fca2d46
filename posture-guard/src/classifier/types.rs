use crate::metrics::Feature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which baseline(s) a session compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Personal calibration profile (must be complete)
    Calibrated,
    /// First valid frame of the session
    #[default]
    BaselineDrift,
    /// Either strategy flags slouching
    Both,
}

impl Strategy {
    pub fn needs_calibration(&self) -> bool {
        matches!(self, Self::Calibrated | Self::Both)
    }

    pub fn uses_session_baseline(&self) -> bool {
        matches!(self, Self::BaselineDrift | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mild => f.write_str("mild"),
            Self::Moderate => f.write_str("moderate"),
            Self::Severe => f.write_str("severe"),
        }
    }
}

/// A single posture problem found in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureIssue {
    ForwardHead,
    UnevenShoulders,
    TorsoTilt,
    HeadTilt,
    ForwardLean,
}

impl PostureIssue {
    pub fn for_feature(feature: Feature) -> Option<Self> {
        match feature {
            Feature::HeadShoulderRatio => Some(Self::ForwardHead),
            Feature::ShoulderAsymmetry => Some(Self::UnevenShoulders),
            Feature::TorsoAngle => Some(Self::TorsoTilt),
            Feature::NeckAngle => Some(Self::HeadTilt),
            Feature::ForwardLean => Some(Self::ForwardLean),
            Feature::ShoulderWidth => None,
        }
    }

    /// Human readable reason
    pub fn description(&self) -> &'static str {
        match self {
            Self::ForwardHead => "forward head posture",
            Self::UnevenShoulders => "uneven shoulders",
            Self::TorsoTilt => "torso tilted",
            Self::HeadTilt => "head tilted",
            Self::ForwardLean => "leaning forward",
        }
    }
}

impl fmt::Display for PostureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Per-frame classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub slouching: bool,
    pub severity: Severity,
    /// Weighted deviation score
    pub deviation: f64,
    pub issues: Vec<PostureIssue>,
}

impl Verdict {
    pub fn reasons(&self) -> Vec<&'static str> {
        self.issues.iter().map(PostureIssue::description).collect()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.slouching {
            return write!(f, "good posture (deviation {:.1})", self.deviation);
        }
        write!(
            f,
            "{} slouch (deviation {:.1}): {}",
            self.severity,
            self.deviation,
            self.reasons().join(", ")
        )
    }
}
