use crate::metrics::{Feature, PostureMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative deviation above which a stored calibration is considered stale
pub const DEFAULT_DRIFT_TOLERANCE: f64 = 0.15;

/// Baseline values smaller than this are compared absolutely
const MIN_RELATIVE_BASE: f64 = 1e-6;

/// Outcome of re-checking a baseline against a fresh sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DriftReport {
    WithinRange,
    RecalibrationNeeded {
        feature: Feature,
        #[serde(rename = "deviationPct")]
        deviation_pct: f64,
    },
    NoCalibration,
}

impl DriftReport {
    pub fn needs_recalibration(&self) -> bool {
        !matches!(self, Self::WithinRange)
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithinRange => f.write_str("within range"),
            Self::RecalibrationNeeded {
                feature,
                deviation_pct,
            } => write!(
                f,
                "recalibration needed: {} deviates by {:.1}%",
                feature, deviation_pct
            ),
            Self::NoCalibration => f.write_str("recalibration needed: no calibration"),
        }
    }
}

/// Relative deviation of `sample` from `baseline`
///
/// The denominator never drops below the feature's relative floor, so an
/// angle near 0° compares against a fixed span of degrees.
pub(crate) fn relative_deviation(feature: Feature, sample: f64, baseline: f64) -> f64 {
    let diff = (sample - baseline).abs();
    let base = baseline.abs().max(feature.relative_floor());
    if base < MIN_RELATIVE_BASE {
        diff
    } else {
        diff / base
    }
}

/// Compare a sample against a good-posture baseline
///
/// Reports the feature with the largest relative deviation when any
/// feature exceeds `tolerance`.
pub fn check_drift(
    baseline: Option<&PostureMetrics>,
    sample: &PostureMetrics,
    tolerance: f64,
) -> DriftReport {
    let Some(baseline) = baseline else {
        return DriftReport::NoCalibration;
    };

    let worst = Feature::ALL
        .iter()
        .map(|&feature| {
            (
                feature,
                relative_deviation(feature, sample.get(feature), baseline.get(feature)),
            )
        })
        .filter(|(_, deviation)| *deviation > tolerance)
        .max_by(|a, b| a.1.total_cmp(&b.1));

    match worst {
        Some((feature, deviation)) => DriftReport::RecalibrationNeeded {
            feature,
            deviation_pct: deviation * 100.0,
        },
        None => DriftReport::WithinRange,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn baseline() -> PostureMetrics {
        PostureMetrics {
            head_shoulder_ratio: 0.3,
            shoulder_asymmetry: 0.02,
            torso_angle: 4.0,
            neck_angle: 20.0,
            forward_lean: 0.1,
            shoulder_width: 0.25,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_identical_sample_is_within_range() {
        let base = baseline();
        for tolerance in [1e-9, 0.01, 0.15, 2.0] {
            assert_eq!(
                check_drift(Some(&base), &base, tolerance),
                DriftReport::WithinRange
            );
        }
    }

    #[test]
    fn test_reports_offending_feature() {
        let base = baseline();
        let mut sample = base;
        sample.head_shoulder_ratio = 0.36;

        match check_drift(Some(&base), &sample, DEFAULT_DRIFT_TOLERANCE) {
            DriftReport::RecalibrationNeeded {
                feature,
                deviation_pct,
            } => {
                assert_eq!(feature, Feature::HeadShoulderRatio);
                assert!((deviation_pct - 20.0).abs() < 1e-6);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_small_deviation_is_within_range() {
        let base = baseline();
        let mut sample = base;
        sample.torso_angle = 5.0;
        sample.shoulder_width = 0.27;

        assert_eq!(
            check_drift(Some(&base), &sample, DEFAULT_DRIFT_TOLERANCE),
            DriftReport::WithinRange
        );
    }

    #[test]
    fn test_missing_baseline_needs_calibration() {
        let report = check_drift(None, &baseline(), DEFAULT_DRIFT_TOLERANCE);
        assert_eq!(report, DriftReport::NoCalibration);
        assert!(report.needs_recalibration());
        assert_eq!(report.to_string(), "recalibration needed: no calibration");
    }

    #[test]
    fn test_zero_baseline_uses_absolute_difference() {
        assert_eq!(relative_deviation(Feature::ForwardLean, 0.05, 0.0), 0.05);
        assert!((relative_deviation(Feature::ForwardLean, 0.4, 0.2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_deviation_uses_degree_floor() {
        // 2 degrees against a 0 degree baseline is 20% of the 10 degree floor
        assert!((relative_deviation(Feature::TorsoAngle, 2.0, 0.0) - 0.2).abs() < 1e-12);
        assert!((relative_deviation(Feature::NeckAngle, 45.0, 30.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_torso_tilt_needs_recalibration() {
        let base = baseline();
        let mut sample = base;
        sample.torso_angle = 25.0;

        match check_drift(Some(&base), &sample, DEFAULT_DRIFT_TOLERANCE) {
            DriftReport::RecalibrationNeeded { feature, .. } => {
                assert_eq!(feature, Feature::TorsoAngle)
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn test_identical_metrics_never_drift(
            head in 0.0f64..5.0,
            asymmetry in 0.0f64..1.0,
            torso in 0.0f64..=180.0,
            neck in 0.0f64..=180.0,
            lean in 0.0f64..1.0,
            width in 1e-4f64..1.0,
            tolerance in 1e-12f64..10.0,
        ) {
            let metrics = PostureMetrics {
                head_shoulder_ratio: head,
                shoulder_asymmetry: asymmetry,
                torso_angle: torso,
                neck_angle: neck,
                forward_lean: lean,
                shoulder_width: width,
                timestamp_ms: 0,
            };
            prop_assert_eq!(
                check_drift(Some(&metrics), &metrics, tolerance),
                DriftReport::WithinRange
            );
        }
    }
}
