use serde::{Deserialize, Serialize};

/// Score weights for the five slouch indicators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub head_shoulder_ratio: f64,
    pub shoulder_asymmetry: f64,
    pub torso_angle: f64,
    pub neck_angle: f64,
    pub forward_lean: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            head_shoulder_ratio: 30.0,
            shoulder_asymmetry: 20.0,
            torso_angle: 25.0,
            neck_angle: 20.0,
            forward_lean: 15.0,
        }
    }
}

/// Tolerances for comparing against a calibrated good posture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratedThresholds {
    /// Fraction of the baseline ratio
    pub head_ratio_tolerance: f64,
    /// Added to the baseline asymmetry
    pub asymmetry_slack: f64,
    /// Degrees
    pub torso_tolerance_deg: f64,
    /// Degrees
    pub neck_tolerance_deg: f64,
    /// Fraction of the baseline lean
    pub forward_lean_tolerance: f64,
    pub weights: FeatureWeights,
    pub min_issues: usize,
    pub slouch_score: f64,
    pub moderate_score: f64,
    pub severe_score: f64,
}

impl Default for CalibratedThresholds {
    fn default() -> Self {
        Self {
            head_ratio_tolerance: 0.20,
            asymmetry_slack: 0.05,
            torso_tolerance_deg: 18.0,
            neck_tolerance_deg: 20.0,
            forward_lean_tolerance: 0.30,
            weights: FeatureWeights::default(),
            min_issues: 2,
            slouch_score: 35.0,
            moderate_score: 40.0,
            severe_score: 60.0,
        }
    }
}

/// Percentage-change limits for comparing against the session baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftThresholds {
    pub head_ratio_pct: f64,
    pub asymmetry_pct: f64,
    pub forward_lean_pct: f64,
    pub torso_pct: f64,
    pub neck_pct: f64,
    pub min_issues: usize,
    /// Summed percentage change of flagged features
    pub slouch_score: f64,
    /// Require both the issue count and the score instead of either
    pub require_both: bool,
    pub moderate_score: f64,
    pub severe_score: f64,
}

impl DriftThresholds {
    pub fn standard() -> Self {
        Self {
            head_ratio_pct: 15.0,
            asymmetry_pct: 25.0,
            forward_lean_pct: 25.0,
            torso_pct: 20.0,
            neck_pct: 20.0,
            min_issues: 2,
            slouch_score: 50.0,
            require_both: false,
            moderate_score: 70.0,
            severe_score: 120.0,
        }
    }

    /// Tolerates ordinary movement at the cost of slower detection
    pub fn relaxed() -> Self {
        Self {
            head_ratio_pct: 25.0,
            asymmetry_pct: 40.0,
            forward_lean_pct: 40.0,
            torso_pct: 30.0,
            neck_pct: 30.0,
            min_issues: 2,
            slouch_score: 40.0,
            require_both: true,
            ..Self::standard()
        }
    }
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self::relaxed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub calibrated: CalibratedThresholds,
    pub drift: DriftThresholds,
}
