use super::config::DriftThresholds;
use super::types::{PostureIssue, Severity, Verdict};
use crate::calibration::relative_deviation;
use crate::metrics::{Feature, PostureMetrics};

/// Compare a frame against the posture captured at session start
///
/// Works on percentage change per feature, so no calibration is needed.
pub fn classify_drift(
    current: &PostureMetrics,
    baseline: &PostureMetrics,
    thresholds: &DriftThresholds,
) -> Verdict {
    let limits = [
        (Feature::HeadShoulderRatio, thresholds.head_ratio_pct),
        (Feature::ShoulderAsymmetry, thresholds.asymmetry_pct),
        (Feature::ForwardLean, thresholds.forward_lean_pct),
        (Feature::TorsoAngle, thresholds.torso_pct),
        (Feature::NeckAngle, thresholds.neck_pct),
    ];

    let mut issues = Vec::new();
    let mut total = 0.0;

    for (feature, limit) in limits {
        let change_pct = relative_deviation(feature, current.get(feature), baseline.get(feature)) * 100.0;
        if change_pct > limit {
            if let Some(issue) = PostureIssue::for_feature(feature) {
                issues.push(issue);
            }
            total += change_pct;
        }
    }

    let enough_issues = issues.len() >= thresholds.min_issues;
    let enough_deviation = total > thresholds.slouch_score;
    let slouching = if thresholds.require_both {
        enough_issues && enough_deviation
    } else {
        enough_issues || enough_deviation
    };

    let severity = if total > thresholds.severe_score {
        Severity::Severe
    } else if total > thresholds.moderate_score {
        Severity::Moderate
    } else {
        Severity::Mild
    };

    Verdict {
        slouching,
        severity,
        deviation: total,
        issues,
    }
}
