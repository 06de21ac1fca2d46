use super::config::CalibratedThresholds;
use super::types::{PostureIssue, Severity, Verdict};
use crate::metrics::PostureMetrics;

/// Keeps fractional tolerances positive when a baseline value is zero
const MIN_TOLERANCE: f64 = 1e-6;

/// Compare a frame against the calibrated good posture
pub fn classify_calibrated(
    current: &PostureMetrics,
    good: &PostureMetrics,
    thresholds: &CalibratedThresholds,
) -> Verdict {
    let weights = &thresholds.weights;
    let mut issues = Vec::new();
    let mut total = 0.0;

    let mut flag = |issue: PostureIssue, diff: f64, tolerance: f64, weight: f64| {
        issues.push(issue);
        total += diff / tolerance * weight;
    };

    let head_diff = (current.head_shoulder_ratio - good.head_shoulder_ratio).abs();
    let head_tolerance = (good.head_shoulder_ratio * thresholds.head_ratio_tolerance).max(MIN_TOLERANCE);
    if head_diff > head_tolerance {
        flag(
            PostureIssue::ForwardHead,
            head_diff,
            head_tolerance,
            weights.head_shoulder_ratio,
        );
    }

    // Compared as an absolute level rather than a difference
    let asymmetry_limit = (good.shoulder_asymmetry + thresholds.asymmetry_slack).max(MIN_TOLERANCE);
    if current.shoulder_asymmetry > asymmetry_limit {
        flag(
            PostureIssue::UnevenShoulders,
            current.shoulder_asymmetry,
            asymmetry_limit,
            weights.shoulder_asymmetry,
        );
    }

    let torso_diff = (current.torso_angle - good.torso_angle).abs();
    if torso_diff > thresholds.torso_tolerance_deg {
        flag(
            PostureIssue::TorsoTilt,
            torso_diff,
            thresholds.torso_tolerance_deg,
            weights.torso_angle,
        );
    }

    let neck_diff = (current.neck_angle - good.neck_angle).abs();
    if neck_diff > thresholds.neck_tolerance_deg {
        flag(
            PostureIssue::HeadTilt,
            neck_diff,
            thresholds.neck_tolerance_deg,
            weights.neck_angle,
        );
    }

    let lean_diff = (current.forward_lean - good.forward_lean).abs();
    let lean_tolerance = (good.forward_lean * thresholds.forward_lean_tolerance).max(MIN_TOLERANCE);
    if lean_diff > lean_tolerance {
        flag(
            PostureIssue::ForwardLean,
            lean_diff,
            lean_tolerance,
            weights.forward_lean,
        );
    }

    let slouching = issues.len() >= thresholds.min_issues || total > thresholds.slouch_score;

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
